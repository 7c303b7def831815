use std::io::Write;

use super::{CommandLine, ShellAdapter, finish_script};
use crate::completion::Completer;
use crate::dispatch::CompletionEnv;
use crate::error::Result;
use crate::tree::CommandNode;

pub struct ZshShell;

impl ShellAdapter for ZshShell {
    fn name(&self) -> &'static str {
        "zsh"
    }

    fn source_script(&self, prog: &str, complete_var: &str) -> String {
        finish_script(&format!(
            r#"
#compdef {prog}
_{prog}() {{
  eval $(env COMMANDLINE="${{words[1,$CURRENT]}}" {complete_var}=complete-zsh {prog})
}}
if [[ "$(basename ${{(%):-%x}})" != "_{prog}" ]]; then
  autoload -U compinit && compinit
  compdef _{prog} {prog}
fi
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
        let line = CommandLine::parse(env.commandline().unwrap_or_default());

        let items: Vec<String> = completer
            .get_choices(root, prog, &line.args, &line.incomplete)
            .map(|c| match c.help_text() {
                Some(help) => format!(r#""{}"\:"{}""#, escape(&c.value), escape(help)),
                None => format!(r#""{}""#, escape(&c.value)),
            })
            .collect();
        writeln!(out, "_arguments '*: :(({}))'", items.join(" "))?;
        Ok(())
    }
}

/// Escape for a double-quoted word inside the single-quoted `_arguments` spec
fn escape(value: &str) -> String {
    value
        .replace('"', "\"\"")
        .replace('\'', "''")
        .replace('$', "\\$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DocumentedChoice, Param};

    fn tree() -> CommandNode {
        CommandNode::new("prog").param(Param::argument("target").value_type(DocumentedChoice::new([
            ("$HOME", "home dir"),
            ("it's", ""),
            ("plain", "say \"hi\""),
        ])))
    }

    #[test]
    fn test_source_script() {
        let script = ZshShell.source_script("prog", "_PROG_COMPLETE");

        assert!(script.starts_with("#compdef prog\n_prog() {\n"));
        assert!(script.contains(
            "eval $(env COMMANDLINE=\"${words[1,$CURRENT]}\" _PROG_COMPLETE=complete-zsh prog)"
        ));
        assert!(script.contains("if [[ \"$(basename ${(%):-%x})\" != \"_prog\" ]]; then"));
        assert!(script.ends_with("  compdef _prog prog\nfi;"));
    }

    #[test]
    fn test_single_arguments_line() {
        let env = CompletionEnv::new("_PROG_COMPLETE").with_commandline("prog ");
        let mut out = Vec::new();
        ZshShell
            .complete(&Completer::new(), &tree(), "prog", &env, &mut out)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "_arguments '*: :((\"\\$HOME\"\\:\"home dir\" \"it''s\" \"plain\"\\:\"say \"\"hi\"\"\"))'\n"
        );
    }

    #[test]
    fn test_no_candidates() {
        let env = CompletionEnv::new("_PROG_COMPLETE").with_commandline("prog zzz");
        let mut out = Vec::new();
        ZshShell
            .complete(&Completer::new(), &tree(), "prog", &env, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "_arguments '*: :(())'\n");
    }
}
