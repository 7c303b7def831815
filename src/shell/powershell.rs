use std::io::Write;

use super::{CommandLine, ShellAdapter, finish_script};
use crate::completion::Completer;
use crate::dispatch::CompletionEnv;
use crate::error::Result;
use crate::quoting::{double_quote, single_quote};
use crate::tokenizer::{is_blank, split_args};
use crate::tree::CommandNode;

pub struct PowerShellShell;

impl ShellAdapter for PowerShellShell {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn source_script(&self, prog: &str, complete_var: &str) -> String {
        let backup = backup_name(prog);
        finish_script(&format!(
            r#"
if ((Test-Path Function:\TabExpansion) -and -not (Test-Path Function:\{backup})) {{
    Rename-Item Function:\TabExpansion {backup}
}}

function TabExpansion($line, $lastWord) {{
    $lastBlock = [regex]::Split($line, '[|;]')[-1].TrimStart()
    $aliases = @("{prog}") + @(Get-Alias | where {{ $_.Definition -eq "{prog}" }} | select -Exp Name)
    $aliasPattern = "($($aliases -join '|'))"
    if($lastBlock -match "^$aliasPattern ") {{
        $Env:{complete_var} = "complete-powershell"
        $Env:COMMANDLINE = "$lastBlock"
        ({prog}) | ? {{$_.trim() -ne "" }}
        Remove-Item Env:{complete_var}
        Remove-Item Env:COMMANDLINE
    }}
    elseif (Test-Path Function:\{backup}) {{
        # Fall back on existing tab expansion
        {backup} $line $lastWord
    }}
}}
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
        let raw = env.commandline().unwrap_or_default();
        let line = CommandLine::parse(raw);

        let quote: fn(&str) -> String = if opened_with_double_quote(raw, &line) {
            double_quote
        } else {
            single_quote
        };

        for candidate in completer.get_choices(root, prog, &line.args, &line.incomplete) {
            writeln!(out, "{}", quote(&candidate.value))?;
        }
        Ok(())
    }
}

/// Name under which an existing `TabExpansion` function is preserved
fn backup_name(prog: &str) -> String {
    format!("{}TabExpansionBackup", prog.to_lowercase().replace('-', "_"))
}

/// Check whether the incomplete token was typed after an opening `"`
fn opened_with_double_quote(raw: &str, line: &CommandLine) -> bool {
    let has_incomplete = !raw.ends_with(is_blank) && split_args(raw).len() > 1;
    if !has_incomplete {
        return false;
    }
    raw.rfind(line.incomplete.as_str())
        .is_some_and(|pos| raw[..pos].ends_with('"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Choice, Param};

    fn tree() -> CommandNode {
        CommandNode::new("prog")
            .param(Param::argument("file").value_type(Choice::new(["my file", "it's", "plain"])))
    }

    fn run(line: &str) -> String {
        let env = CompletionEnv::new("_PROG_COMPLETE").with_commandline(line);
        let mut out = Vec::new();
        PowerShellShell
            .complete(&Completer::new(), &tree(), "prog", &env, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_source_script() {
        let script = PowerShellShell.source_script("My-Prog", "_MY_PROG_COMPLETE");

        assert!(script.starts_with(
            "if ((Test-Path Function:\\TabExpansion) -and -not (Test-Path Function:\\my_progTabExpansionBackup)) {"
        ));
        assert!(script.contains("$aliases = @(\"My-Prog\") + @(Get-Alias | where { $_.Definition -eq \"My-Prog\" } | select -Exp Name)"));
        assert!(script.contains("$Env:_MY_PROG_COMPLETE = \"complete-powershell\""));
        assert!(script.ends_with("        my_progTabExpansionBackup $line $lastWord\n    }\n};"));
    }

    #[test]
    fn test_single_quotes_by_default() {
        assert_eq!(run("prog "), "'my file'\n'it'\"'\"'s'\nplain\n");
    }

    #[test]
    fn test_double_quotes_after_open_double_quote() {
        assert_eq!(run("prog \"my"), "\"my file\"\n");
    }

    #[test]
    fn test_explicit_empty_double_quoted_token() {
        assert_eq!(run("prog \"\""), "\"my file\"\n\"it's\"\nplain\n");
    }

    #[test]
    fn test_backup_name() {
        assert_eq!(backup_name("My-Tool"), "my_toolTabExpansionBackup");
    }
}
