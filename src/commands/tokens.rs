//! `sitescope tokens` commands.

use std::path::Path;

use serde_json::Value;

use crate::cli::TokensCommand;
use crate::context::ServiceContext;
use crate::tokens::{
    flatten, format_for_prompt, set_value_at_path, FlatToken, TokenTree, VALUE_KEY,
};

/// Execute a `tokens` subcommand.
///
/// # Errors
///
/// Returns an error string if the token file cannot be read, parsed or written.
pub fn run(ctx: &ServiceContext, command: &TokensCommand) -> Result<(), String> {
    match command {
        TokensCommand::Flatten { file } => {
            let tree = load(ctx, file)?;
            print!("{}", render_flat(&flatten(&tree)));
        }
        TokensCommand::Prompt { file } => {
            let tree = load(ctx, file)?;
            println!("{}", format_for_prompt(&flatten(&tree)));
        }
        TokensCommand::Set {
            file,
            path,
            value,
            output,
        } => {
            let tree = load(ctx, file)?;
            let new_value = parse_value(value);
            let updated = set_value_at_path(&tree, path, new_value.clone());
            if value_at(&updated, path).as_ref() != Some(&new_value) {
                log::warn!(
                    "token path {path} not found in {}; nothing changed",
                    file.display()
                );
            } else if updated == tree {
                log::info!("token {path} already holds that value");
            }
            let json = updated.to_json_pretty().map_err(|e| e.to_string())?;
            match output {
                Some(out) => {
                    ctx.fs
                        .write(out, &format!("{json}\n"))
                        .map_err(|e| format!("failed to write {}: {e}", out.display()))?;
                    log::info!("wrote {}", out.display());
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn load(ctx: &ServiceContext, file: &Path) -> Result<TokenTree, String> {
    let text = ctx
        .fs
        .read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    TokenTree::from_json_str(&text).map_err(|e| format!("{}: {e}", file.display()))
}

/// The `$value` a dotted path addresses, if the path reaches one.
fn value_at(tree: &TokenTree, path: &str) -> Option<Value> {
    let root = tree.to_value();
    let node = path
        .split('.')
        .try_fold(&root, |node, segment| node.get(segment))?;
    node.get(VALUE_KEY).cloned()
}

/// JSON when it parses, otherwise the text as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// One `path<TAB>type<TAB>value` line per token.
fn render_flat(tokens: &[FlatToken]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}\t{}\t{}\n", t.path, t.token_type, t.display_value))
        .collect()
}
