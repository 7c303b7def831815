use std::io::Write;

use super::{CommandLine, ShellAdapter, finish_script};
use crate::completion::Completer;
use crate::dispatch::CompletionEnv;
use crate::error::Result;
use crate::tree::CommandNode;

pub struct FishShell;

impl ShellAdapter for FishShell {
    fn name(&self) -> &'static str {
        "fish"
    }

    fn source_script(&self, prog: &str, complete_var: &str) -> String {
        finish_script(&format!(
            r#"complete --command {prog} --arguments "(env {complete_var}=complete-fish COMMANDLINE=(commandline -cp) {prog})" -f"#
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

        for candidate in completer.get_choices(root, prog, &line.args, &line.incomplete) {
            match candidate.help_text() {
                Some(help) => writeln!(out, "{}\t{}", candidate.value, help)?,
                None => writeln!(out, "{}", candidate.value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Param;

    fn tree() -> CommandNode {
        CommandNode::group("prog")
            .param(Param::flag("verbose", ["--verbose"]).secondary_opts(["--no-verbose"]).help("Talk more"))
            .subcommand(CommandNode::new("open").short_help("Open a file"))
            .subcommand(CommandNode::new("close"))
    }

    fn run(line: &str) -> String {
        let env = CompletionEnv::new("_PROG_COMPLETE").with_commandline(line);
        let mut out = Vec::new();
        FishShell
            .complete(&Completer::new(), &tree(), "prog", &env, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_source_script() {
        assert_eq!(
            FishShell.source_script("prog", "_PROG_COMPLETE"),
            "complete --command prog --arguments \"(env _PROG_COMPLETE=complete-fish COMMANDLINE=(commandline -cp) prog)\" -f;"
        );
    }

    #[test]
    fn test_help_separated_by_tab() {
        assert_eq!(run("prog "), "open\tOpen a file\nclose\n");
    }

    #[test]
    fn test_secondary_option_has_no_help() {
        assert_eq!(run("prog --"), "--verbose\tTalk more\n--no-verbose\n--help\tShow this message and exit.\n");
    }

    #[test]
    fn test_missing_commandline_is_empty_line() {
        let env = CompletionEnv::new("_PROG_COMPLETE");
        let mut out = Vec::new();
        FishShell
            .complete(&Completer::new(), &tree(), "prog", &env, &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "open\tOpen a file\nclose\n");
    }
}
