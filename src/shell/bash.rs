use std::io::Write;

use super::{ShellAdapter, finish_script, function_ident};
use crate::completion::Completer;
use crate::dispatch::CompletionEnv;
use crate::error::Result;
use crate::tokenizer::{split_args, split_strict};
use crate::tree::CommandNode;

pub struct BashShell;

impl ShellAdapter for BashShell {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn source_script(&self, prog: &str, complete_var: &str) -> String {
        let func = format!("_{}_completion", function_ident(prog));
        finish_script(&format!(
            r#"
{func}() {{
    local IFS=$'\t'
    COMPREPLY=( $( env COMP_WORDS="${{COMP_WORDS[*]}}" \
                   COMP_CWORD=$COMP_CWORD \
                   {complete_var}=complete $1 ) )
    return 0
}}

complete -F {func} -o default {prog}
"#
        ))
    }

    fn complete(
        &self,
        completer: &Completer,
        root: &CommandNode,
        prog: &str,
        env: &CompletionEnv,
        out: &mut dyn Write,
    ) -> Result<()> {
        let words = env.comp_words().unwrap_or_default();

        // Words already quoted by the shell must not be escaped again
        let (cwords, quoted) = match split_strict(words) {
            Some(cwords) => (cwords, false),
            None => {
                tracing::debug!(words, "COMP_WORDS has an open quote, using tolerant split");
                (split_args(words), true)
            }
        };

        // An unusable cursor index offers nothing
        let cword = match env.cword_index() {
            Ok(Some(cword)) => cword,
            Ok(None) => cwords.len(),
            Err(e) => {
                tracing::debug!(error = %e, "cannot locate the cursor word");
                return Ok(());
            }
        };

        let end = cword.min(cwords.len());
        let args = cwords.get(1..end).map(<[String]>::to_vec).unwrap_or_default();
        let incomplete = cwords.get(cword).map(String::as_str).unwrap_or_default();

        let reply: Vec<String> = completer
            .get_choices(root, prog, &args, incomplete)
            .map(|c| if quoted { c.value } else { escape(&c.value) })
            .collect();
        write!(out, "{}", reply.join("\t"))?;
        Ok(())
    }
}

/// Backslash-escape whitespace, backslashes and quotes
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_whitespace() || matches!(c, '\\' | '"' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Choice, Param};

    fn tree() -> CommandNode {
        CommandNode::group("prog")
            .subcommand(
                CommandNode::new("open")
                    .param(Param::argument("file").value_type(Choice::new(["my file.txt", "plain.txt"]))),
            )
            .subcommand(CommandNode::new("close"))
    }

    fn run(words: &str, cword: Option<&str>) -> Result<String> {
        let mut env = CompletionEnv::new("_PROG_COMPLETE").with_comp_words(words);
        if let Some(cword) = cword {
            env = env.with_comp_cword(cword);
        }
        let mut out = Vec::new();
        BashShell.complete(&Completer::new(), &tree(), "prog", &env, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_source_script() {
        let script = BashShell.source_script("my-prog", "_MY_PROG_COMPLETE");

        assert!(script.starts_with("_my_prog_completion() {\n    local IFS=$'\\t'\n"));
        assert!(script.contains("COMPREPLY=( $( env COMP_WORDS=\"${COMP_WORDS[*]}\" \\\n"));
        assert!(script.contains("_MY_PROG_COMPLETE=complete $1 ) )"));
        assert!(script.ends_with("complete -F _my_prog_completion -o default my-prog;"));
    }

    #[test]
    fn test_complete_subcommands_tab_joined() {
        assert_eq!(run("prog ", Some("1")).unwrap(), "open\tclose");
        assert_eq!(run("prog c", Some("1")).unwrap(), "close");
    }

    #[test]
    fn test_complete_escapes_values() {
        assert_eq!(run("prog open ", Some("2")).unwrap(), "my\\ file.txt\tplain.txt");
    }

    #[test]
    fn test_complete_open_quote_is_not_escaped() {
        assert_eq!(run("prog open \"my", Some("2")).unwrap(), "my file.txt");
    }

    #[test]
    fn test_cursor_past_end_completes_empty_token() {
        assert_eq!(run("prog open", Some("5")).unwrap(), "my\\ file.txt\tplain.txt");
        assert_eq!(run("prog", None).unwrap(), "open\tclose");
    }

    #[test]
    fn test_invalid_cword_offers_nothing() {
        assert_eq!(run("prog ", Some("one")).unwrap(), "");
        assert_eq!(run("prog ", Some("-1")).unwrap(), "");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a b"), "a\\ b");
        assert_eq!(escape("it's"), "it\\'s");
        assert_eq!(escape("x\\y\"z"), "x\\\\y\\\"z");
        assert_eq!(escape("plain"), "plain");
    }
}
