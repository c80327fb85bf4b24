/*
 * A line-oriented console rendition of the slide menu. It plays the role of the
 * presentation collaborator: typed commands become `AppEvent`s, and the
 * `PlatformCommand`s the logic enqueues are rendered as text. Row numbers typed by the
 * user are 1-based positions in the list as it was last displayed.
 */
use super::error::{PlatformError, Result as PlatformResult};
use super::types::{
    AppEvent, MessageSeverity, PlatformCommand, PlatformEventHandler, RowDataSource,
    RowDescriptor,
};
use crate::core::FolderId;
use std::io::{BufRead, Write};

const HELP_TEXT: &str = "\
Commands:
  menu | swipe          open the folder menu
  close                 close the folder menu
  add <name>            add a top-level folder
  child <row> <name>    add a folder inside the folder on <row>
  arrow <row>           expand or collapse a folder
  tap <row>             tap a row (toggles selection once something is selected)
  select <row>          select or deselect a folder
  delete <row>          delete a folder and everything inside it
  hide <row>            mark or unmark a folder as hidden
  hidemode              toggle filtering of hidden folders
  search [text]         filter by name; no text clears the search
  clear                 clear the selection
  list                  redraw the list
  quit                  exit";

// What a typed line asks the console to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    Event(AppEvent),
    List,
    Help,
    Nothing,
}

/*
 * Parses one line of input. `displayed` are the ids of the rows currently on screen, used
 * to resolve row numbers. Row commands are refused while the menu is closed.
 */
pub fn parse_command(
    line: &str,
    displayed: &[FolderId],
    menu_showing: bool,
) -> PlatformResult<ConsoleAction> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleAction::Nothing);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let row = |text: &str| -> PlatformResult<FolderId> {
        if !menu_showing {
            return Err(PlatformError::InvalidInput(
                "the folder menu is closed, open it with 'menu'".to_string(),
            ));
        }
        let number: usize = text
            .parse()
            .map_err(|_| PlatformError::InvalidInput(format!("'{text}' is not a row number")))?;
        number
            .checked_sub(1)
            .and_then(|index| displayed.get(index).copied())
            .ok_or(PlatformError::InvalidRow(number))
    };
    let require_name = |text: &str| -> PlatformResult<String> {
        if text.is_empty() {
            Err(PlatformError::InvalidInput(format!(
                "'{verb}' needs a folder name"
            )))
        } else {
            Ok(text.to_string())
        }
    };

    let event = match verb {
        "menu" => AppEvent::MenuButtonClicked,
        "swipe" => AppEvent::EdgeSwipeBegan,
        "close" => AppEvent::OverlayTapped,
        "add" => AppEvent::AddFolderSubmitted {
            name: require_name(rest)?,
        },
        "child" => {
            let (row_text, name) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                PlatformError::InvalidInput("usage: child <row> <name>".to_string())
            })?;
            AppEvent::AddChildFolderSubmitted {
                parent: row(row_text)?,
                name: require_name(name.trim())?,
            }
        }
        "arrow" => AppEvent::ArrowTapped { item: row(rest)? },
        "tap" => AppEvent::RowTapped { item: row(rest)? },
        "select" => AppEvent::SelectActionChosen { item: row(rest)? },
        "delete" => AppEvent::DeleteActionChosen { item: row(rest)? },
        "hide" => AppEvent::HideFlagToggleChosen { item: row(rest)? },
        "hidemode" => AppEvent::ToggleHideModeClicked,
        "search" => AppEvent::SearchTextChanged {
            text: rest.to_string(),
        },
        "clear" => AppEvent::ClearSelectionClicked,
        "quit" | "exit" => AppEvent::QuitRequested,
        "list" => return Ok(ConsoleAction::List),
        "help" | "?" => return Ok(ConsoleAction::Help),
        other => {
            return Err(PlatformError::InvalidInput(format!(
                "unknown command '{other}', type 'help'"
            )));
        }
    };
    Ok(ConsoleAction::Event(event))
}

// Renders a single row: indentation, arrow, name, then markers.
pub fn render_row(number: usize, row: &RowDescriptor) -> String {
    let indent = "  ".repeat(row.depth);
    let arrow = match (row.has_children, row.arrow_rotated) {
        (false, _) => "  ",
        (true, false) => "▸ ",
        (true, true) => "▾ ",
    };
    let mut text = format!("{number:>3}  {indent}{arrow}{}", row.text);
    if row.has_children {
        text.push_str(" ›");
    }
    if row.is_selected {
        text.push_str(" ✓");
    }
    if row.is_hidden {
        text.push_str(" (hidden)");
    }
    text
}

pub struct ConsolePlatform<R: BufRead, W: Write> {
    input: R,
    output: W,
    menu_showing: bool,
    displayed: Vec<FolderId>,
}

impl<R: BufRead, W: Write> ConsolePlatform<R, W> {
    pub fn new(input: R, output: W) -> Self {
        ConsolePlatform {
            input,
            output,
            menu_showing: false,
            displayed: Vec::new(),
        }
    }

    /*
     * Runs the input loop until EOF or until the logic asks to quit. The logic is told the
     * main view is ready before the first prompt, and `on_quit` is called on the way out.
     */
    pub fn run<H>(&mut self, handler: &mut H) -> PlatformResult<()>
    where
        H: PlatformEventHandler + RowDataSource,
    {
        log::debug!("Platform: Console loop starting.");
        handler.handle_event(AppEvent::MainWindowReady);
        let mut quit = self.drain_commands(handler)?;
        writeln!(self.output, "Type 'menu' to open the folders, 'help' for commands.")?;

        let mut line = String::new();
        while !quit {
            write!(self.output, "{}", if self.menu_showing { "menu> " } else { "> " })?;
            self.output.flush()?;
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                log::debug!("Platform: End of input, leaving console loop.");
                break;
            }

            match parse_command(&line, &self.displayed, self.menu_showing) {
                Ok(ConsoleAction::Event(event)) => {
                    log::trace!("Platform: Dispatching {event:?}");
                    handler.handle_event(event);
                    quit = self.drain_commands(handler)?;
                }
                Ok(ConsoleAction::List) => self.render_all(&*handler)?,
                Ok(ConsoleAction::Help) => writeln!(self.output, "{HELP_TEXT}")?,
                Ok(ConsoleAction::Nothing) => {}
                Err(e) => {
                    log::debug!("Platform: Rejected input {:?}: {e}", line.trim());
                    writeln!(self.output, "! {e}")?;
                }
            }
        }

        handler.on_quit();
        log::debug!("Platform: Console loop exited cleanly.");
        Ok(())
    }

    // Executes every queued command. Returns true if the logic asked to quit.
    fn drain_commands<H>(&mut self, handler: &mut H) -> PlatformResult<bool>
    where
        H: PlatformEventHandler + RowDataSource,
    {
        let mut quit = false;
        while let Some(command) = handler.try_dequeue_command() {
            if self.execute_command(command, &*handler)? {
                quit = true;
            }
        }
        Ok(quit)
    }

    pub fn execute_command(
        &mut self,
        command: PlatformCommand,
        rows: &dyn RowDataSource,
    ) -> PlatformResult<bool> {
        match command {
            PlatformCommand::ShowSlideMenu { width } => {
                self.menu_showing = true;
                writeln!(self.output, "── Folders ({width}pt) ──")?;
                self.render_all(rows)?;
            }
            PlatformCommand::HideSlideMenu => {
                self.menu_showing = false;
                writeln!(self.output, "── menu closed ──")?;
            }
            PlatformCommand::PopulateRows { rows: descriptors } => {
                self.displayed = descriptors.iter().map(|row| row.id).collect();
                if self.menu_showing {
                    self.render_rows(&descriptors)?;
                }
            }
            PlatformCommand::UpdateRowSelection { item, selected } => {
                log::trace!("Platform: Row {item} selection -> {selected}");
                if let (Some(position), Some(row)) = (
                    self.displayed.iter().position(|id| *id == item),
                    rows.row_for(item),
                ) {
                    writeln!(self.output, "{}", render_row(position + 1, &row))?;
                }
            }
            PlatformCommand::DeselectRow { item } => {
                log::trace!("Platform: Row {item} highlight cleared");
            }
            PlatformCommand::ScrollToRow { item } => {
                if let Some(position) = self.displayed.iter().position(|id| *id == item) {
                    writeln!(self.output, "→ row {}", position + 1)?;
                }
            }
            PlatformCommand::UpdateStatus { text, severity } => {
                let prefix = match severity {
                    MessageSeverity::Information => "·",
                    MessageSeverity::Warning => "!",
                };
                writeln!(self.output, "{prefix} {text}")?;
            }
            PlatformCommand::QuitApplication => return Ok(true),
        }
        Ok(false)
    }

    fn render_all(&mut self, rows: &dyn RowDataSource) -> PlatformResult<()> {
        let descriptors: Vec<RowDescriptor> =
            (0..rows.row_count()).filter_map(|index| rows.row_at(index)).collect();
        self.displayed = descriptors.iter().map(|row| row.id).collect();
        self.render_rows(&descriptors)
    }

    fn render_rows(&mut self, descriptors: &[RowDescriptor]) -> PlatformResult<()> {
        if descriptors.is_empty() {
            writeln!(self.output, "   (no folders)")?;
        }
        for (index, row) in descriptors.iter().enumerate() {
            writeln!(self.output, "{}", render_row(index + 1, row))?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}
