use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "snipz", bin_name = "snipz", version)]
#[command(about = "Personal snippet and bookmark store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (-vv also enables debug logging)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Save a snippet read from stdin
    #[command(display_order = 1)]
    Save {
        /// Key such as go/foo (generated when omitted)
        key: Option<String>,

        /// Tag shorthand: @tag or #tag
        #[arg(value_name = "@TAG", allow_hyphen_values = true)]
        shorthand: Vec<String>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Tags (repeatable, comma lists allowed)
        #[arg(short, long = "tags")]
        tags: Vec<String>,

        /// Echo the content instead of the key
        #[arg(long)]
        tee: bool,
    },

    /// Print a snippet's content, or change its tags
    #[command(display_order = 2)]
    Get {
        key: String,

        /// Tags to add instead of printing (repeatable, comma lists allowed)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Tags to remove instead of printing (repeatable, comma lists allowed)
        #[arg(short, long)]
        untag: Vec<String>,

        /// Tag shorthand: @tag adds, -@tag removes (after any flags)
        #[arg(value_name = "@TAG", allow_hyphen_values = true)]
        shorthand: Vec<String>,
    },

    /// List snippets, newest first
    #[command(alias = "ls", display_order = 3)]
    List {
        /// Delimiter-separated rows (tab by default)
        #[arg(long, value_name = "DELIM", num_args = 0..=1, default_missing_value = "\t")]
        plain: Option<String>,

        /// Only snippets with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Show at most this many snippets
        #[arg(short, long)]
        limit: Option<usize>,

        /// Page number, counted in --limit rows
        #[arg(short, long, requires = "limit")]
        page: Option<usize>,
    },

    /// Edit a snippet in the editor
    #[command(alias = "e", display_order = 10)]
    Edit { key: String },

    /// Open a snippet (URLs in the browser, text with the opener)
    #[command(alias = "o", display_order = 11)]
    Open {
        key: String,

        /// Show in the pager instead
        #[arg(short, long)]
        pager: bool,
    },

    /// Remove a snippet
    #[command(name = "rm", alias = "remove", display_order = 12)]
    Remove { key: String },

    /// Print the file path of one or more snippets
    #[command(display_order = 13)]
    Path {
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Add or remove tags
    #[command(display_order = 14)]
    Tag {
        key: String,

        /// Tags to add (repeatable, comma lists allowed)
        #[arg(short, long)]
        add: Vec<String>,

        /// Tags to remove (repeatable, comma lists allowed)
        #[arg(short, long)]
        remove: Vec<String>,
    },

    /// `snipz <key>`: get, or save when stdin has content
    #[command(external_subcommand)]
    Implicit(Vec<String>),
}
