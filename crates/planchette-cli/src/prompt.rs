//! System prompt section describing the workspace to an agent.

use planchette::tools::CommandKind;

/// A system prompt section explaining the workspace model and listing every
/// command, with tool names under `prefix` when one is set.
pub fn workspace_system_prompt(prefix: Option<&str>) -> String {
    let mut prompt = String::from(
        "\
You have a Workspace of open text files. After every command you receive a \
report of the Workspace: the focused Window first, then the others in the \
order you last used them. Windows that do not fit in the report are listed \
as hidden.

The focused Window has a cursor and may have a selection. Move the cursor \
by naming text that appears in the file, select the text you want to \
change, then edit it. Edits are saved immediately. Edit does not move the \
cursor, so navigate again before the next edit.

Commands:",
    );
    for kind in CommandKind::ALL {
        let info = kind.info();
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{}", kind.name()),
            None => kind.name().to_string(),
        };
        prompt.push_str(&format!(
            "\n- {name}: {}. Example: {}",
            info.description, info.example_arguments
        ));
    }
    prompt
}
