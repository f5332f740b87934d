//! Version synchronization
//!
//! Bumps every module and every intra-repo requirement to the same target, in
//! memory only. Dependencies are pointed at the target even though their files
//! are rewritten later in the run: the whole repository releases as one.

use crate::core::events::{EventSink, ReleaseEvent};
use crate::modules::Workspace;
use crate::version::ReleaseVersion;

/// Rewrite module versions and intra-repo requirements to `target`.
///
/// Takes an already validated version, so it cannot fail.
pub fn sync_versions(workspace: &mut Workspace, target: &ReleaseVersion, events: &mut dyn EventSink) {
  let ids: Vec<_> = workspace.ids().collect();
  for id in ids {
    let dep_paths: Vec<String> = workspace
      .get(id)
      .dependencies
      .iter()
      .map(|dep| workspace.get(dep.id).path().to_string())
      .collect();

    let module = workspace.get_mut(id);
    let from = module.version().to_string();
    module.manifest.set_version(target.as_str());
    for dep_path in &dep_paths {
      module.manifest.set_requirement(dep_path, target.as_str());
    }

    events.emit(ReleaseEvent::VersionSet {
      module: module.path().to_string(),
      from,
      to: target.to_string(),
    });
  }
}
