use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Activate the highlighted source and run `service.refresh()`
    ActivateSource,
    /// Re-run `service.refresh()` for the active source
    Refresh,
    /// Run `service.submit_measurements`(...) for the current form state
    SubmitUpload,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q')
        && key.modifiers.is_empty()
        && !matches!(app.screen, Screen::UploadForm)
    {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::SourceSelect => match key.code {
            Up | Char('k') => {
                if app.source_list_index > 0 {
                    app.source_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.source_list_index + 1 < app.sources.len() {
                    app.source_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                action = Action::ActivateSource;
            }
            _ => {}
        },

        Screen::MapView => match key.code {
            Char('r') => {
                action = Action::Refresh;
            }
            Char('u') => {
                app.screen = Screen::UploadForm;
                app.upload_status = None;
            }
            Left | Esc => {
                app.screen = Screen::SourceSelect;
            }
            _ => {}
        },

        Screen::UploadForm => match key.code {
            Up => {
                if app.district_list_index > 0 {
                    app.district_list_index -= 1;
                }
            }
            Down => {
                if app.district_list_index + 1 < app.selection.len() {
                    app.district_list_index += 1;
                }
            }
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.file_input.push(character);
                }
            }
            Backspace => {
                app.file_input.pop();
            }
            Enter => {
                action = Action::SubmitUpload;
            }
            Left | Esc => {
                app.screen = Screen::MapView;
            }
            _ => {}
        },
    }
    action
}
