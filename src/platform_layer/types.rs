/*
 * This module defines the vocabulary shared by the application logic and whatever
 * presentation layer renders the slide menu. It includes the row descriptor the
 * presentation draws, platform-agnostic events (`AppEvent`) flowing from the UI into the
 * logic, commands (`PlatformCommand`) flowing back, and the two traits the logic
 * implements: `PlatformEventHandler` for interactions and `RowDataSource` for row content.
 */

use crate::core::FolderId;

// Describes a single row of the folder list.
//
// The presentation layer renders one row per descriptor, in order, and never
// looks at the folder tree itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    pub id: FolderId,
    pub text: String,
    pub depth: usize,
    // Shows both the expand arrow and the disclosure affordance.
    pub has_children: bool,
    // Arrow is drawn rotated (pointing down) when the folder is open.
    pub arrow_rotated: bool,
    pub is_selected: bool,
    pub is_hidden: bool,
}

// Defines the severity of a message shown in the status line.
// Ordered from least to most severe for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageSeverity {
    Information,
    Warning,
}

/*
 * Represents platform-agnostic UI events.
 *
 * The presentation layer translates taps, gestures, context-menu choices and text
 * commits into these values and hands them to the application logic. Folder-targeted
 * events carry the `FolderId` of the row they originated from.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // The main content view is on screen; the logic loads its data.
    MainWindowReady,
    // The hamburger button on the main content view.
    MenuButtonClicked,
    // A swipe starting at the left screen edge began.
    EdgeSwipeBegan,
    // The dimmed overlay behind the open menu was tapped.
    OverlayTapped,
    AddFolderSubmitted {
        name: String,
    },
    AddChildFolderSubmitted {
        parent: FolderId,
        name: String,
    },
    ArrowTapped {
        item: FolderId,
    },
    RowTapped {
        item: FolderId,
    },
    // Context-menu "select"/"deselect" choice.
    SelectActionChosen {
        item: FolderId,
    },
    DeleteActionChosen {
        item: FolderId,
    },
    // Context-menu "hide"/"unhide" choice; flips the folder's own hide flag.
    HideFlagToggleChosen {
        item: FolderId,
    },
    ToggleHideModeClicked,
    SearchTextChanged {
        text: String,
    },
    ClearSelectionClicked,
    QuitRequested,
}

// Represents platform-agnostic commands sent from the application logic to the
// presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCommand {
    // Slide the menu panel in, together with the dimming overlay.
    ShowSlideMenu {
        width: u32,
    },
    HideSlideMenu,
    // Replace all rows of the folder list.
    PopulateRows {
        rows: Vec<RowDescriptor>,
    },
    UpdateRowSelection {
        item: FolderId,
        selected: bool,
    },
    // Clear the platform's transient row highlight without changing the selection.
    DeselectRow {
        item: FolderId,
    },
    ScrollToRow {
        item: FolderId,
    },
    UpdateStatus {
        text: String,
        severity: MessageSeverity,
    },
    QuitApplication,
}

// --- Traits implemented by the application logic ---

// The platform layer calls these methods on the application logic to report
// user interactions and to collect the resulting commands.
pub trait PlatformEventHandler: Send + 'static {
    // Handle the event and enqueue `PlatformCommand`s for the platform layer.
    fn handle_event(&mut self, event: AppEvent);

    // Called when the platform's loop is about to exit.
    fn on_quit(&mut self) {}

    // Dequeues a single pending command. Called by the platform's run loop until
    // it returns `None`.
    fn try_dequeue_command(&mut self) -> Option<PlatformCommand>;
}

/*
 * Row content queries, the datasource half of the list interface.
 * Indices refer to the list as last published with `PopulateRows`.
 */
pub trait RowDataSource {
    fn row_count(&self) -> usize;
    fn row_at(&self, index: usize) -> Option<RowDescriptor>;
    fn row_for(&self, id: FolderId) -> Option<RowDescriptor>;
}
