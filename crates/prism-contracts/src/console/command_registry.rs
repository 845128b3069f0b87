#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
}

pub(crate) const MODEL_ID_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "show",
        action: "show",
    },
    CommandSpec {
        command: "resolve",
        action: "resolve",
    },
    CommandSpec {
        command: "chain",
        action: "chain",
    },
    CommandSpec {
        command: "unredirect",
        action: "clear_redirect",
    },
    CommandSpec {
        command: "remove",
        action: "remove",
    },
    CommandSpec {
        command: "add",
        action: "add",
    },
];

pub(crate) const COLOR_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "palette",
        action: "palette",
    },
    CommandSpec {
        command: "dark",
        action: "dark_palette",
    },
];

pub(crate) const REDIRECT_COMMAND: CommandSpec = CommandSpec {
    command: "redirect",
    action: "set_redirect",
};

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "list",
        action: "list",
    },
    CommandSpec {
        command: "diff",
        action: "diff",
    },
    CommandSpec {
        command: "save",
        action: "save",
    },
    CommandSpec {
        command: "help",
        action: "help",
    },
    CommandSpec {
        command: "quit",
        action: "quit",
    },
    CommandSpec {
        command: "exit",
        action: "quit",
    },
];

pub const CONSOLE_HELP_COMMANDS: &[&str] = &[
    "/list",
    "/show <id>",
    "/resolve <id>",
    "/chain <id>",
    "/redirect <id> <target>",
    "/unredirect <id>",
    "/add <id>",
    "/remove <id>",
    "/palette <hex>",
    "/dark <hex>",
    "/diff",
    "/save",
    "/quit",
];
