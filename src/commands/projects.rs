//! `sitescope projects` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::Error;
use crate::platform::PlatformInfo;
use crate::store::ProjectStore;

/// Execute the `projects` command.
///
/// Prints one `id<TAB>platform<TAB>confidence` line per stored project, with
/// `-` for projects that were never detected.
///
/// # Errors
///
/// Returns an error string if the store cannot be listed or a platform
/// record is unreadable.
pub fn run(ctx: &ServiceContext, settings: &Settings) -> Result<(), String> {
    let store = ProjectStore::new(ctx, &settings.store_root);
    let ids = store.list_projects().map_err(|e| e.to_string())?;
    if ids.is_empty() {
        log::info!("no projects under {}", settings.store_root.display());
    }

    let mut out = String::new();
    for id in &ids {
        let info = match store.load_platform(id) {
            Ok(info) => Some(info),
            Err(Error::NotFound(_)) => None,
            Err(e) => return Err(e.to_string()),
        };
        out.push_str(&render_row(id, info.as_ref()));
    }
    print!("{out}");
    Ok(())
}

fn render_row(id: &str, info: Option<&PlatformInfo>) -> String {
    match info {
        Some(info) => format!(
            "{id}\t{}\t{}\n",
            info.platform.as_str(),
            info.confidence.as_str()
        ),
        None => format!("{id}\t-\t-\n"),
    }
}
