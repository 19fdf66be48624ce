use crate::args::{ArgSchema, ArgSpec};
use crate::command::{
    CmdMessage, CmdResult, Command, CommandInput, CommandMeta, Context, ListedWorkspace,
};
use crate::error::{Result, ShellError};
use crate::model::{ShellState, Workspace};
use crate::store::WorkspaceStore;

pub struct WorkspaceCommand {
    meta: CommandMeta,
}

impl Default for WorkspaceCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceCommand {
    pub fn new() -> Self {
        let schema = ArgSchema::new()
            .arg(ArgSpec::positional("target", "Workspace to switch to or act on"))
            .arg(ArgSpec::flag(&["-a", "--add"], "Create the target workspace"))
            .arg(ArgSpec::flag(&["-d", "--delete"], "Delete the target workspace"))
            .arg(ArgSpec::option(
                &["--desc", "--description"],
                "Workspace description ('' clears it)",
            ))
            .exclusive(&["add", "delete"])
            .exclusive(&["delete", "desc"]);

        let meta = CommandMeta::new(
            "workspace",
            "Manage workspaces",
            "Without arguments, lists workspaces and marks the current one.\n\
             With a target, switches to it. Use --add or --delete to create or\n\
             remove the target, and --desc to set its description.",
        )
        .alias("workspaces")
        .arguments(schema);
        Self { meta }
    }
}

impl Command for WorkspaceCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn run(&self, ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult> {
        let args = input.args();
        let add = args.flag("add");
        let delete = args.flag("delete");
        let description = args.text("desc");

        let Some(target) = args.text("target") else {
            if add || delete {
                return Ok(CmdResult::default()
                    .with_message(CmdMessage::error("Missing argument 'target'")));
            }
            return list(ctx.store, ctx.state);
        };

        if add {
            create(ctx.store, target, description.unwrap_or_default())
        } else if delete {
            remove(ctx.store, ctx.state, target)
        } else if let Some(description) = description {
            describe(ctx.store, target, description)
        } else {
            switch(ctx.store, ctx.state, target)
        }
    }
}

fn list(store: &dyn WorkspaceStore, state: &ShellState) -> Result<CmdResult> {
    let listed = store
        .list()?
        .into_iter()
        .map(|workspace| ListedWorkspace {
            is_current: workspace.name == state.current_workspace,
            workspace,
        })
        .collect();
    Ok(CmdResult::default().with_listed_workspaces(listed))
}

fn create(store: &mut dyn WorkspaceStore, name: &str, description: &str) -> Result<CmdResult> {
    if store.exists(name)? {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "Workspace '{}' already exists",
            name
        ))));
    }
    store.save(&Workspace::new(name, description))?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Workspace '{}' created",
        name
    ))))
}

fn remove(store: &mut dyn WorkspaceStore, state: &ShellState, name: &str) -> Result<CmdResult> {
    if name == state.current_workspace {
        return Ok(CmdResult::default().with_message(CmdMessage::error(format!(
            "Cannot delete the current workspace '{}'",
            name
        ))));
    }
    if !store.delete(name)? {
        return Err(ShellError::WorkspaceNotFound(name.to_string()));
    }
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Workspace '{}' deleted",
        name
    ))))
}

fn describe(store: &mut dyn WorkspaceStore, name: &str, description: &str) -> Result<CmdResult> {
    let mut workspace = store
        .get(name)?
        .ok_or_else(|| ShellError::WorkspaceNotFound(name.to_string()))?;
    workspace.set_description(description);
    store.save(&workspace)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Workspace '{}' updated",
        name
    ))))
}

fn switch(store: &dyn WorkspaceStore, state: &mut ShellState, name: &str) -> Result<CmdResult> {
    if !store.exists(name)? {
        return Err(ShellError::WorkspaceNotFound(name.to_string()));
    }
    state.current_workspace = name.to_string();
    Ok(CmdResult::default().with_message(CmdMessage::info(format!(
        "Switched to workspace '{}'",
        name
    ))))
}
