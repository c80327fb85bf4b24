/*
 * This module provides the application logic layer, centered around `FolderMenuLogic`
 * which acts as the Presenter/Controller for the slide menu. `MenuUiState` holds the
 * menu's presentation state. Unit tests for `FolderMenuLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod menu_ui_state;


pub use handler::FolderMenuLogic;
pub use menu_ui_state::MenuUiState;
