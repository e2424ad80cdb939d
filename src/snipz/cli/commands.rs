use super::print::{
    eprint_messages, print_messages, print_plain, print_records, print_tag_changes,
};
use super::setup::{Cli, Commands};
use super::shorthand::split_tag_words;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use snipz::api::{Page, SnipzApi};
use snipz::commands::save::SaveRequest;
use snipz::config::process_env;
use snipz::error::Result;
use snipz::init::initialize;
use snipz::store::sqlite::SqliteStore;
use std::io::{self, IsTerminal, Read, Write};

struct AppContext {
    api: SnipzApi<SqliteStore>,
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = initialize(&process_env)?;
    let mut ctx = AppContext {
        api: ctx.api,
        verbose: cli.verbose > 0,
    };

    match cli.command {
        Some(command) => dispatch(&mut ctx, command, None),
        None => handle_list(&ctx, None, None, None, None),
    }
}

/// `piped` carries stdin when it was already read to pick an implicit command.
fn dispatch(ctx: &mut AppContext, command: Commands, piped: Option<Vec<u8>>) -> Result<()> {
    match command {
        Commands::Save {
            key,
            shorthand,
            description,
            tags,
            tee,
        } => {
            let content = match piped {
                Some(content) => content,
                None => read_stdin()?,
            };
            handle_save(ctx, key, shorthand, description, tags, tee, content)
        }
        Commands::Get {
            key,
            tag,
            untag,
            shorthand,
        } => handle_get(ctx, &key, tag, untag, &shorthand),
        Commands::List {
            plain,
            tag,
            limit,
            page,
        } => handle_list(ctx, plain, tag, limit, page),
        Commands::Edit { key } => handle_edit(ctx, &key),
        Commands::Open { key, pager } => handle_open(ctx, &key, pager),
        Commands::Remove { key } => handle_remove(ctx, &key),
        Commands::Path { keys } => handle_paths(ctx, &keys),
        Commands::Tag { key, add, remove } => handle_tag(ctx, &key, &add, &remove),
        Commands::Implicit(words) => handle_implicit(ctx, words),
    }
}

/// `snipz <key> ...` saves when stdin brings content and gets otherwise.
/// The words are parsed again as the chosen subcommand, so keys that clash
/// with a subcommand name need the explicit form.
fn handle_implicit(ctx: &mut AppContext, words: Vec<String>) -> Result<()> {
    let piped = if io::stdin().is_terminal() {
        None
    } else {
        Some(read_stdin()?).filter(|content| !content.is_empty())
    };
    let verb = if piped.is_some() { "save" } else { "get" };
    log::debug!("implicit {verb} for {words:?}");

    let args = ["snipz", verb].into_iter().map(String::from).chain(words);
    let cli = Cli::try_parse_from(args).unwrap_or_else(|err| err.exit());
    ctx.verbose |= cli.verbose > 0;

    match cli.command {
        Some(Commands::Implicit(_)) | None => Ok(()),
        Some(command) => dispatch(ctx, command, piped),
    }
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut content = Vec::new();
    io::stdin().read_to_end(&mut content)?;
    Ok(content)
}

fn usage_error(kind: ErrorKind, message: String) -> ! {
    Cli::command().error(kind, message).exit()
}

/// `SNIPZ_LOG` wins; otherwise `warn`, or `debug` with `-vv`.
fn init_logging(verbosity: u8) {
    let default = if verbosity >= 2 { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("SNIPZ_LOG", default))
        .format_timestamp(None)
        .init();
}

fn handle_save(
    ctx: &mut AppContext,
    key: Option<String>,
    shorthand: Vec<String>,
    description: Option<String>,
    mut tags: Vec<String>,
    tee: bool,
    content: Vec<u8>,
) -> Result<()> {
    let words = split_tag_words(&key.into_iter().chain(shorthand).collect::<Vec<_>>());
    if let Some(tag) = words.remove.first() {
        usage_error(
            ErrorKind::ArgumentConflict,
            format!("cannot remove tag '{tag}' from a new snippet"),
        );
    }
    if let Some(extra) = words.rest.get(1) {
        usage_error(
            ErrorKind::UnknownArgument,
            format!("unexpected argument '{extra}'"),
        );
    }
    tags.extend(words.add);

    let mut request = SaveRequest::new(content).with_tags(&tags);
    request.key = words.rest.into_iter().next();
    if let Some(description) = description {
        request = request.with_description(description);
    }

    let echoed = if tee { Some(request.content.clone()) } else { None };
    let result = ctx.api.save(request)?;

    let mut stdout = io::stdout().lock();
    match echoed {
        Some(content) => stdout.write_all(&content)?,
        None => {
            if let Some(record) = result.record() {
                writeln!(stdout, "{}", record.key)?;
            }
        }
    }
    stdout.flush()?;

    if ctx.verbose {
        eprint_messages(&result.messages);
    }
    Ok(())
}

/// With any tag change requested, `get` updates tags instead of printing.
fn handle_get(
    ctx: &mut AppContext,
    key: &str,
    mut add: Vec<String>,
    mut remove: Vec<String>,
    shorthand: &[String],
) -> Result<()> {
    let words = split_tag_words(shorthand);
    if let Some(extra) = words.rest.first() {
        usage_error(
            ErrorKind::UnknownArgument,
            format!("unexpected argument '{extra}' (flags go before @tags)"),
        );
    }
    add.extend(words.add);
    remove.extend(words.remove);
    if !add.is_empty() || !remove.is_empty() {
        return handle_tag(ctx, key, &add, &remove);
    }

    let result = ctx.api.get(key)?;
    if let Some(content) = &result.content {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content)?;
        stdout.flush()?;
    }
    eprint_messages(&result.messages);
    Ok(())
}

fn handle_list(
    ctx: &AppContext,
    plain: Option<String>,
    tag: Option<String>,
    limit: Option<usize>,
    page: Option<usize>,
) -> Result<()> {
    let page = match limit {
        Some(limit) => Some(Page::new(limit, page.unwrap_or(1))?),
        None => None,
    };
    let result = ctx.api.list(tag.as_deref(), page)?;
    match plain {
        Some(delimiter) => print_plain(&result.listed, &delimiter, ctx.verbose),
        None => print_records(&result.listed, ctx.verbose),
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, key: &str) -> Result<()> {
    let result = ctx.api.edit(key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_open(ctx: &AppContext, key: &str, pager: bool) -> Result<()> {
    let result = ctx.api.open(key, pager)?;
    if ctx.verbose {
        print_messages(&result.messages);
    }
    Ok(())
}

fn handle_remove(ctx: &mut AppContext, key: &str) -> Result<()> {
    let result = ctx.api.remove(key)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_paths(ctx: &AppContext, keys: &[String]) -> Result<()> {
    let result = ctx.api.paths(keys)?;
    for path in &result.paths {
        println!("{}", path.display());
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_tag(ctx: &mut AppContext, key: &str, add: &[String], remove: &[String]) -> Result<()> {
    let result = ctx.api.update_tags(key, add, remove)?;
    print_messages(&result.messages);
    print_tag_changes(&result.tags_added, &result.tags_removed);
    Ok(())
}
