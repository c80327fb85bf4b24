/*
 * This module defines the MenuUiState struct.
 * MenuUiState holds state that belongs to the slide menu's presentation rather than to
 * the folder data: whether the panel is showing, the process-wide hide mode, the current
 * search text, and the rows last published to the platform layer. The rows double as the
 * answer to `RowDataSource` queries.
 */
use crate::core::FolderId;
use crate::platform_layer::RowDescriptor;

#[derive(Debug, Default)]
pub struct MenuUiState {
    pub is_menu_showing: bool,
    /* When on, folders whose own hide flag is set are filtered out of the list. */
    pub hide_mode: bool,
    /* Current search keyword, already trimmed. `None` when no search is active. */
    pub search_text: Option<String>,
    /* The rows as last sent with `PopulateRows`. */
    pub rows: Vec<RowDescriptor>,
}

impl MenuUiState {
    pub fn new(hide_mode: bool) -> Self {
        log::debug!("MenuUiState::new called with hide_mode: {hide_mode}");
        MenuUiState {
            hide_mode,
            ..Default::default()
        }
    }

    /*
     * Stores the search text. Blank or whitespace-only text clears the search so the
     * list goes back to the open-state view.
     */
    pub fn set_search_text(&mut self, text: &str) {
        let trimmed = text.trim();
        self.search_text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn row_index_of(&self, id: FolderId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn row_for(&self, id: FolderId) -> Option<&RowDescriptor> {
        self.rows.iter().find(|row| row.id == id)
    }

    /*
     * Keeps the cached row in step with a selection change that was sent as an
     * `UpdateRowSelection` command rather than a full repopulate.
     */
    pub fn set_row_selected(&mut self, id: FolderId, selected: bool) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
            row.is_selected = selected;
        }
    }

    // One-line summary for the status line.
    pub fn compose_status_text(&self, folder_count: usize, selected_count: usize) -> String {
        let mut status = format!("{folder_count} folder(s)");
        if selected_count > 0 {
            status = format!("{status}, {selected_count} selected");
        }
        if self.hide_mode {
            status = format!("{status} - hidden folders filtered");
        }
        if let Some(keyword) = &self.search_text {
            status = format!("{status} - search: \"{keyword}\"");
        }
        status
    }
}
