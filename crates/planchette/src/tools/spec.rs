//! Structured tool descriptions with usage guidance.
//!
//! A [`ToolSpec`] carries a purpose line plus optional guidance on when to
//! use the tool, when not to, worked examples, and disambiguation against
//! look-alike tools. [`ToolSpec::to_description`] flattens it into the
//! single description string the function-calling API accepts.

use crate::ToolDef;

#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name (must be unique within a ToolSet).
    pub name: String,
    /// One-sentence imperative purpose.
    pub purpose: String,
    pub when_to_use: Option<String>,
    pub when_not_to_use: Option<String>,
    /// JSON Schema for the arguments.
    pub parameters: serde_json::Value,
    pub examples: Vec<UsageExample>,
    pub output_format: Option<String>,
    pub disambiguation: Vec<DisambiguationExample>,
}

/// A situation where this tool is easily confused with another one.
#[derive(Debug, Clone)]
pub struct DisambiguationExample {
    pub scenario: String,
    pub correct_tool: String,
    pub reason: String,
}

/// A usage example: a described input and the expected behavior.
#[derive(Debug, Clone)]
pub struct UsageExample {
    pub input: String,
    pub output: String,
}

impl ToolSpec {
    /// Start a spec. The purpose is the only required field; parameters
    /// default to an empty object schema.
    pub fn builder(name: impl Into<String>, purpose: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            spec: ToolSpec {
                name: name.into(),
                purpose: purpose.into(),
                when_to_use: None,
                when_not_to_use: None,
                parameters: serde_json::json!({"type": "object", "properties": {}}),
                examples: Vec::new(),
                output_format: None,
                disambiguation: Vec::new(),
            },
        }
    }

    /// Flatten into a description string for the LLM.
    pub fn to_description(&self) -> String {
        let mut desc = format!("{}.", self.purpose.trim_end_matches('.'));
        if let Some(when) = &self.when_to_use {
            desc.push_str(&format!("\nWhen to use: {when}"));
        }
        if let Some(when_not) = &self.when_not_to_use {
            desc.push_str(&format!("\nWhen NOT to use: {when_not}"));
        }

        if !self.examples.is_empty() {
            desc.push_str("\nExamples:");
            for ex in &self.examples {
                desc.push_str(&format!("\n  - {} → {}", ex.input, ex.output));
            }
        }

        if let Some(format) = &self.output_format {
            desc.push_str(&format!("\nOutput format: {format}"));
        }

        if !self.disambiguation.is_empty() {
            desc.push_str("\nDisambiguation:");
            for d in &self.disambiguation {
                desc.push_str(&format!(
                    "\n  - {}: use '{}' instead ({})",
                    d.scenario, d.correct_tool, d.reason
                ));
            }
        }

        desc
    }

    pub fn to_tool_def(&self) -> ToolDef {
        ToolDef::new(
            self.name.clone(),
            self.to_description(),
            self.parameters.clone(),
        )
    }
}

/// Builder for a [`ToolSpec`].
pub struct ToolSpecBuilder {
    spec: ToolSpec,
}

impl ToolSpecBuilder {
    pub fn when_to_use(mut self, when: impl Into<String>) -> Self {
        self.spec.when_to_use = Some(when.into());
        self
    }

    pub fn when_not_to_use(mut self, when_not: impl Into<String>) -> Self {
        self.spec.when_not_to_use = Some(when_not.into());
        self
    }

    pub fn parameters(mut self, params: serde_json::Value) -> Self {
        self.spec.parameters = params;
        self
    }

    /// Derive JSON Schema parameters from a `schemars::JsonSchema` type.
    pub fn parameters_for<T: schemars::JsonSchema>(self) -> Self {
        self.parameters(crate::json_schema_for::<T>())
    }

    pub fn example(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.spec.examples.push(UsageExample {
            input: input.into(),
            output: output.into(),
        });
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.spec.output_format = Some(format.into());
        self
    }

    pub fn disambiguate(
        mut self,
        scenario: impl Into<String>,
        correct_tool: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.spec.disambiguation.push(DisambiguationExample {
            scenario: scenario.into(),
            correct_tool: correct_tool.into(),
            reason: reason.into(),
        });
        self
    }

    /// Shortcut for `.build().to_tool_def()`.
    pub fn to_tool_def(self) -> ToolDef {
        self.build().to_tool_def()
    }

    pub fn build(self) -> ToolSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_spec_description() {
        let spec = ToolSpec::builder("before", "Position the cursor before some text")
            .when_to_use("When you want to insert text ahead of a known anchor")
            .when_not_to_use("When you want to replace text")
            .example(r#"{"target": "fn main"}"#, "Cursor moves to the start of `fn main`")
            .output_format("The rendered workspace")
            .disambiguate("Inserting after an anchor", "after", "it places the cursor past the match")
            .build();

        let desc = spec.to_description();
        assert!(desc.starts_with("Position the cursor before some text."));
        assert!(desc.contains("When NOT to use: When you want to replace text"));
        assert!(desc.contains("Examples:\n  - {\"target\": \"fn main\"}"));
        assert!(desc.contains("Output format: The rendered workspace"));
        assert!(desc.contains("use 'after' instead"));
    }

    #[test]
    fn minimal_spec_has_only_purpose() {
        let def = ToolSpec::builder("noop", "Do nothing.").to_tool_def();
        assert_eq!(def.function.name, "noop");
        assert_eq!(def.function.description, "Do nothing.");
        assert_eq!(def.function.parameters["type"], "object");
    }

    #[test]
    fn parameters_for_derives_schema() {
        #[derive(schemars::JsonSchema)]
        #[allow(dead_code)]
        struct Args {
            /// A path.
            file: String,
        }
        let spec = ToolSpec::builder("t", "Test").parameters_for::<Args>().build();
        assert_eq!(spec.parameters["properties"]["file"]["type"], "string");
    }
}
