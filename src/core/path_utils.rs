/*
 * Resolves the per-user directory where the folder menu keeps its configuration,
 * folder document and log file. All of them live side by side in the application's
 * local (non-roaming) configuration directory.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local configuration directory, creating it if needed.
 * No organization qualifier is used, so the directory sits directly under the user's
 * local configuration root (e.g. `~/.config/<app_name>` on Linux).
 *
 * Returns `None` if no home directory can be determined or the directory cannot be
 * created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: Failed to create config dir {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config dir {config_path:?}");
    }
    Some(config_path.to_path_buf())
}

// Path of a named file inside the application's config directory.
pub fn app_file_path(app_name: &str, file_name: &str) -> Option<PathBuf> {
    get_base_app_config_local_dir(app_name).map(|dir| dir.join(file_name))
}
