use std::path::PathBuf;

pub(crate) const HELP: &str = "\
Commands:
  open              click the drop surface (then enter path(s); an empty line
                    or any command cancels the picker)
  drag | leave      drag a file over / away from the drop surface
  drop <path>...    drop file(s) on the drop surface
  pick <path>...    choose file(s) directly in the file picker
  convert           upload the selected file
  save [dest]       save the converted file (default ./<download name>)
  help              show this text
  quit              exit";

/// One line of user input, mapped onto drop-surface gestures and buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Open,
    DragEnter,
    DragLeave,
    Drop(Vec<PathBuf>),
    Pick(Vec<PathBuf>),
    Convert,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<PathBuf> = words.map(PathBuf::from).collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "open" => Command::Open,
        "drag" => Command::DragEnter,
        "leave" => Command::DragLeave,
        "drop" => Command::Drop(args),
        "pick" => Command::Pick(args),
        "convert" => Command::Convert,
        "save" => Command::Save(args.into_iter().next()),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(command)
}

/// Reads the answer to an open file picker. A blank line is a cancelled dialog.
pub(crate) fn parse_picker_answer(line: &str) -> Vec<PathBuf> {
    line.split_whitespace().map(PathBuf::from).collect()
}
