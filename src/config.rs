// ABOUTME: Version and welcome-banner constants for the CLI/REPL front end

pub const VERSION: &str = "0.1.0";
pub const WELCOME_MESSAGE: &str = "Signo";
pub const WELCOME_SUBTITLE: &str = "A small Lisp-family language";
pub const WELCOME_FOOTER: &str = "Type (quit) or press Ctrl-D to exit.";
