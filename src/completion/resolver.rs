//! Context resolution: walk the command tree down to the command being completed

use super::matcher::PrefixMatcher;
use crate::tree::{CommandNode, Context};

/// Resolve the deepest command context for `args` using the default matcher
///
/// Returns `None` when the arguments name a subcommand the tree does not
/// have.
pub fn resolve_ctx<'a>(root: &'a CommandNode, prog: &str, args: &[String]) -> Option<Context<'a>> {
    walk(Context::new(root, prog), args)
}

/// Resolve the deepest command context, filtering candidates with `matcher`
pub fn resolve_ctx_with<'a>(
    root: &'a CommandNode,
    prog: &str,
    args: &[String],
    matcher: &'a dyn PrefixMatcher,
) -> Option<Context<'a>> {
    walk(Context::new(root, prog).with_matcher(matcher), args)
}

fn walk<'a>(mut ctx: Context<'a>, args: &[String]) -> Option<Context<'a>> {
    ctx.parse_args(args.to_vec());

    while ctx.command().is_group() {
        let mut residual = ctx.residual_args();
        if residual.is_empty() {
            break;
        }
        let name = residual.remove(0);

        let Some(command) = lookup(&ctx, &name) else {
            tracing::debug!(
                group = %ctx.command_path(),
                subcommand = %name,
                "no such subcommand, nothing to complete"
            );
            return None;
        };

        let mut child = ctx.child(command, name);
        child.parse_args(residual);
        ctx = child;
    }

    tracing::trace!(command = %ctx.command_path(), "resolved context");
    Some(ctx)
}

/// Find a child by name, retrying through the token normalization if any
fn lookup<'a>(ctx: &Context<'a>, name: &str) -> Option<&'a CommandNode> {
    let group = ctx.command();
    if let Some(command) = group.get_command(name) {
        return Some(command);
    }

    let normalize = ctx.token_normalize()?;
    let wanted = normalize(name);
    group
        .subcommands()
        .iter()
        .find(|c| normalize(c.name()) == wanted)
}
