/*
 * This module consolidates the platform-agnostic core of the folder menu. It holds the
 * folder data model and tree store, the flatten/search/hide pipeline that turns the tree
 * into display order, the selection set, and the collaborators behind traits
 * (`FolderStorageOperations`, `ConfigManagerOperations`) with their JSON-file
 * implementations and an in-memory fallback for folder storage.
 */
pub mod config;
pub mod flatten;
pub mod folder_node;
pub mod folder_tree;
pub mod path_utils;
pub mod selection;
pub mod storage;

// Re-export key structures
pub use folder_node::FolderId;
pub use folder_tree::FolderTree;
pub use selection::{SelectionSet, TapOutcome};

pub use flatten::{FlattenedRow, flatten, flatten_with_search, search_rows, visible_data};

// Re-export storage related items
pub use storage::{CoreFolderStorage, FolderStorageOperations, InMemoryFolderStorage};

// Re-export config related items
pub use config::{ConfigManagerOperations, CoreConfigManager, MenuConfig};
