use crate::app_logic::MenuUiState;
use crate::core::{
    ConfigManagerOperations, FlattenedRow, FolderId, FolderStorageOperations, FolderTree,
    MenuConfig, SelectionSet, TapOutcome, flatten, flatten_with_search, search_rows,
    visible_data,
};
use crate::platform_layer::{
    AppEvent, MessageSeverity, PlatformCommand, PlatformEventHandler, RowDataSource,
    RowDescriptor,
};
use std::collections::VecDeque;
use std::sync::Arc;

pub(crate) const APP_NAME: &str = "FolderMenu";

/*
 * Manages the folder tree, the selection and the slide menu's UI state in a
 * platform-agnostic manner. It processes `AppEvent`s from the platform layer, mutates
 * the tree store and selection, re-runs the flatten/filter pipeline and enqueues
 * `PlatformCommand`s describing the new rows.
 *
 * Persistence goes through `FolderStorageOperations` after every mutation and is
 * best-effort: a failed save is logged and the in-memory tree stays authoritative for
 * the session. Settings changes go through `ConfigManagerOperations` the same way.
 */
pub struct FolderMenuLogic {
    pub(crate) tree: FolderTree,
    pub(crate) selection: SelectionSet,
    pub(crate) ui_state: MenuUiState,
    pub(crate) config: MenuConfig,
    storage: Arc<dyn FolderStorageOperations>,
    config_manager: Arc<dyn ConfigManagerOperations>,
    command_queue: VecDeque<PlatformCommand>,
}

impl FolderMenuLogic {
    /*
     * Creates the presenter with an empty tree. Folders are fetched from storage when the
     * platform reports `MainWindowReady`. The initial hide mode comes from the config.
     */
    pub fn new(
        config: MenuConfig,
        storage: Arc<dyn FolderStorageOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
    ) -> Self {
        FolderMenuLogic {
            tree: FolderTree::new(),
            selection: SelectionSet::new(),
            ui_state: MenuUiState::new(config.hide_mode),
            config,
            storage,
            config_manager,
            command_queue: VecDeque::new(),
        }
    }

    fn enqueue_command(&mut self, command: PlatformCommand) {
        self.command_queue.push_back(command);
    }

    fn set_status(&mut self, text: String, severity: MessageSeverity) {
        self.enqueue_command(PlatformCommand::UpdateStatus { text, severity });
    }

    /*
     * Replaces the in-memory tree with what the storage collaborator holds. Any failure,
     * whether fetching or validating, leaves an empty tree and a warning; the session
     * carries on.
     */
    fn load_folders(&mut self) {
        let loaded = self
            .storage
            .fetch_all()
            .map_err(|e| e.to_string())
            .and_then(|records| FolderTree::from_records(records).map_err(|e| e.to_string()));
        match loaded {
            Ok(tree) if tree.is_empty() => {
                log::info!("AppLogic: No saved folders, starting with an empty tree.");
                self.tree = tree;
            }
            Ok(tree) => {
                log::info!("AppLogic: Loaded {} folder(s) from storage.", tree.len());
                self.tree = tree;
            }
            Err(e) => {
                log::warn!("AppLogic: Could not load folders, starting empty: {e}");
                self.tree = FolderTree::new();
                self.set_status(
                    format!("Saved folders could not be loaded: {e}"),
                    MessageSeverity::Warning,
                );
            }
        }
    }

    // Best-effort save of the whole tree. Failures are logged and otherwise ignored.
    fn save_folders(&self) {
        if let Err(e) = self.storage.save(&self.tree.to_records()) {
            log::warn!("AppLogic: Saving folders failed, keeping in-memory state: {e}");
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config_manager.save_config(APP_NAME, &self.config) {
            log::warn!("AppLogic: Saving menu config failed: {e}");
        }
    }

    fn build_row(&self, row: FlattenedRow) -> Option<RowDescriptor> {
        let id = row.id;
        let node = self.tree.get(id)?;
        Some(RowDescriptor {
            id,
            text: node.name.clone(),
            depth: row.depth,
            has_children: node.has_children(),
            arrow_rotated: node.is_open,
            is_selected: self.selection.contains(id),
            is_hidden: node.is_hide,
        })
    }

    /*
     * Runs the display pipeline: search filter (or policy flatten), then the hide-mode
     * post-filter. Read-only; opening ancestors of matches happens once, when the search
     * text changes, so folders collapsed during a search stay collapsed.
     */
    fn visible_rows(&self) -> Vec<FlattenedRow> {
        let flat = match &self.ui_state.search_text {
            Some(keyword) => search_rows(&self.tree, keyword),
            None => flatten(&self.tree, self.config.flatten_policy),
        };
        visible_data(&self.tree, flat, self.ui_state.hide_mode)
    }

    fn refresh_rows(&mut self) {
        let rows: Vec<RowDescriptor> = self
            .visible_rows()
            .into_iter()
            .filter_map(|id| self.build_row(id))
            .collect();
        log::debug!("AppLogic: Publishing {} row(s).", rows.len());
        self.ui_state.rows = rows.clone();
        self.enqueue_command(PlatformCommand::PopulateRows { rows });
        let status = self
            .ui_state
            .compose_status_text(self.tree.len(), self.selection.len());
        self.set_status(status, MessageSeverity::Information);
    }

    fn present_menu(&mut self) {
        if self.ui_state.is_menu_showing {
            log::trace!("AppLogic: Menu already showing, ignoring present request.");
            return;
        }
        self.ui_state.is_menu_showing = true;
        self.refresh_rows();
        self.enqueue_command(PlatformCommand::ShowSlideMenu {
            width: self.config.menu_width,
        });
    }

    fn dismiss_menu(&mut self) {
        if !self.ui_state.is_menu_showing {
            return;
        }
        self.ui_state.is_menu_showing = false;
        self.enqueue_command(PlatformCommand::HideSlideMenu);
    }

    fn handle_add_folder(&mut self, name: &str) {
        match self.tree.add_root_folder(name) {
            Some(id) => {
                log::info!("AppLogic: Added folder '{name}' ({id}).");
                self.save_folders();
                self.refresh_rows();
            }
            None => self.set_status(
                "A folder name is required.".to_string(),
                MessageSeverity::Warning,
            ),
        }
    }

    fn handle_add_child_folder(&mut self, parent: FolderId, name: &str) {
        match self.tree.add_child_folder(parent, name) {
            Some(id) => {
                log::info!(
                    "AppLogic: Added folder '{name}' ({id}) under {parent} at depth {}.",
                    self.tree.depth(id)
                );
                self.save_folders();
                self.refresh_rows();
                if self.ui_state.row_index_of(id).is_some() {
                    self.enqueue_command(PlatformCommand::ScrollToRow { item: id });
                }
            }
            None => self.set_status(
                "The folder could not be added.".to_string(),
                MessageSeverity::Warning,
            ),
        }
    }

    fn handle_arrow_tapped(&mut self, item: FolderId) {
        if self.tree.toggle_open(item) {
            self.save_folders();
            self.refresh_rows();
        }
    }

    /*
     * A plain tap only changes the selection once something is already selected. The
     * first selection has to come from the context menu's select action.
     */
    fn handle_row_tapped(&mut self, item: FolderId) {
        if !self.tree.contains(item) {
            log::warn!("AppLogic: Tap on unknown folder {item}.");
            self.enqueue_command(PlatformCommand::DeselectRow { item });
            return;
        }
        match self.selection.tap(item) {
            TapOutcome::Ignored => {
                log::trace!("AppLogic: Tap on {item} ignored, nothing selected yet.");
                self.enqueue_command(PlatformCommand::DeselectRow { item });
            }
            TapOutcome::Toggled { selected } => self.publish_selection_change(item, selected),
        }
    }

    fn handle_select_action(&mut self, item: FolderId) {
        if !self.tree.contains(item) {
            log::warn!("AppLogic: Select action on unknown folder {item}.");
            return;
        }
        let selected = self.selection.toggle(item);
        self.publish_selection_change(item, selected);
    }

    fn publish_selection_change(&mut self, item: FolderId, selected: bool) {
        log::debug!(
            "AppLogic: Folder {item} selected={selected}, {} selected in total.",
            self.selection.len()
        );
        self.ui_state.set_row_selected(item, selected);
        self.enqueue_command(PlatformCommand::UpdateRowSelection { item, selected });
        let status = self
            .ui_state
            .compose_status_text(self.tree.len(), self.selection.len());
        self.set_status(status, MessageSeverity::Information);
    }

    fn handle_delete(&mut self, item: FolderId) {
        let removed = self.tree.delete_node(item);
        if removed.is_empty() {
            return;
        }
        let deselected = self.selection.remove_all(&removed);
        log::info!(
            "AppLogic: Deleted {} folder(s), {deselected} of them were selected.",
            removed.len()
        );
        self.save_folders();
        self.refresh_rows();
    }

    fn handle_hide_flag_toggle(&mut self, item: FolderId) {
        if let Some(is_hide) = self.tree.toggle_hide(item) {
            log::debug!("AppLogic: Folder {item} hide flag -> {is_hide}.");
            self.save_folders();
            self.refresh_rows();
        }
    }

    /*
     * A new keyword opens every ancestor of its matches in the store and saves that.
     * Refreshes while the keyword stays the same only filter.
     */
    fn handle_search_text_changed(&mut self, text: &str) {
        self.ui_state.set_search_text(text);
        if let Some(keyword) = self.ui_state.search_text.clone() {
            let outcome = flatten_with_search(&mut self.tree, &keyword);
            log::debug!(
                "AppLogic: Search '{keyword}' keeps {} folder(s).",
                outcome.rows.len()
            );
            if !outcome.opened.is_empty() {
                self.save_folders();
            }
        }
        self.refresh_rows();
    }

    fn handle_toggle_hide_mode(&mut self) {
        self.ui_state.hide_mode = !self.ui_state.hide_mode;
        self.config.hide_mode = self.ui_state.hide_mode;
        log::debug!("AppLogic: Hide mode -> {}.", self.ui_state.hide_mode);
        self.save_config();
        self.refresh_rows();
    }
}

impl PlatformEventHandler for FolderMenuLogic {
    fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: Handling {event:?}");
        match event {
            AppEvent::MainWindowReady => {
                self.load_folders();
                self.refresh_rows();
            }
            AppEvent::MenuButtonClicked | AppEvent::EdgeSwipeBegan => self.present_menu(),
            AppEvent::OverlayTapped => self.dismiss_menu(),
            AppEvent::AddFolderSubmitted { name } => self.handle_add_folder(&name),
            AppEvent::AddChildFolderSubmitted { parent, name } => {
                self.handle_add_child_folder(parent, &name)
            }
            AppEvent::ArrowTapped { item } => self.handle_arrow_tapped(item),
            AppEvent::RowTapped { item } => self.handle_row_tapped(item),
            AppEvent::SelectActionChosen { item } => self.handle_select_action(item),
            AppEvent::DeleteActionChosen { item } => self.handle_delete(item),
            AppEvent::HideFlagToggleChosen { item } => self.handle_hide_flag_toggle(item),
            AppEvent::ToggleHideModeClicked => self.handle_toggle_hide_mode(),
            AppEvent::SearchTextChanged { text } => self.handle_search_text_changed(&text),
            AppEvent::ClearSelectionClicked => {
                self.selection.clear();
                self.refresh_rows();
            }
            AppEvent::QuitRequested => self.enqueue_command(PlatformCommand::QuitApplication),
        }
    }

    fn on_quit(&mut self) {
        log::debug!("AppLogic: on_quit, saving folders one last time.");
        self.save_folders();
    }

    fn try_dequeue_command(&mut self) -> Option<PlatformCommand> {
        self.command_queue.pop_front()
    }
}

impl RowDataSource for FolderMenuLogic {
    fn row_count(&self) -> usize {
        self.ui_state.rows.len()
    }

    fn row_at(&self, index: usize) -> Option<RowDescriptor> {
        self.ui_state.rows.get(index).cloned()
    }

    fn row_for(&self, id: FolderId) -> Option<RowDescriptor> {
        self.ui_state.row_for(id).cloned()
    }
}
