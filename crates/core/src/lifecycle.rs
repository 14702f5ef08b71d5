use dawn_contrast_protocol::{FLAG_ON, Marker, PaletteLayer, ROOT_MARKER};
use serde::{Deserialize, Serialize};

use crate::dom::{Dom, DomResult};
use crate::root::is_root_harsh;
use crate::scan::{ScanReport, scan};
use crate::watcher::MutationWatcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationState {
    #[default]
    Inactive,
    Active,
}

/// Point-in-time view of the controller, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    pub state: ActivationState,
    pub watching: bool,
    pub last_scan: Option<ScanReport>,
}

/// Owns harsh-mode for one document.
///
/// All marker writes flow through here. While [`ActivationState::Inactive`]
/// no element carries a marker; deactivation stops the watcher before it
/// clears them.
pub struct Controller<D: Dom> {
    dom: D,
    state: ActivationState,
    watcher: Option<MutationWatcher<D>>,
    last_scan: Option<ScanReport>,
}

impl<D: Dom> Controller<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            state: ActivationState::Inactive,
            watcher: None,
            last_scan: None,
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            state: self.state,
            watching: self.is_watching(),
            last_scan: self.last_scan,
        }
    }

    /// Assess the page and switch harsh-mode on or off accordingly.
    ///
    /// Safe to call repeatedly: an active controller re-marks and re-scans.
    pub fn evaluate(&mut self) -> ActivationState {
        if is_root_harsh(&self.dom) {
            self.activate();
        } else {
            self.deactivate();
        }
        self.state
    }

    /// Switch harsh-mode off regardless of the page.
    pub fn teardown(&mut self) {
        self.deactivate();
    }

    /// Dispatch mutation batches queued since the last call.
    pub fn process_pending(&mut self) -> usize {
        match self.watcher.as_mut() {
            Some(watcher) => watcher.drain(&self.dom),
            None => 0,
        }
    }

    fn activate(&mut self) {
        let Some(root) = self.dom.document_element() else {
            tracing::debug!("no document element to activate on");
            return;
        };

        if let Err(err) = self.seed_root(&root) {
            tracing::warn!(%err, "failed to mark document root");
        }
        let report = scan(&self.dom, &root);
        self.last_scan = Some(report);

        if self.watcher.is_none() {
            match MutationWatcher::start(&self.dom, &root) {
                Ok(watcher) => self.watcher = Some(watcher),
                Err(err) => tracing::warn!(%err, "failed to start mutation watcher"),
            }
        }

        if self.state == ActivationState::Inactive {
            tracing::info!(
                visited = report.visited,
                truncated = report.truncated,
                "harsh mode activated"
            );
        }
        self.state = ActivationState::Active;
    }

    fn seed_root(&self, root: &D::Element) -> DomResult<()> {
        self.dom.set_attribute(root, ROOT_MARKER, FLAG_ON)?;
        for layer in PaletteLayer::ALL {
            self.dom
                .set_custom_property(root, layer.custom_property(), layer.color())?;
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        if let Some(root) = self.dom.document_element()
            && let Err(err) = self.dom.remove_attribute(&root, ROOT_MARKER)
        {
            tracing::warn!(%err, "failed to unmark document root");
        }
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        let cleared = self.clear_markers();

        if self.state == ActivationState::Active {
            tracing::info!(cleared, "harsh mode deactivated");
        }
        self.state = ActivationState::Inactive;
        self.last_scan = None;
    }

    /// Strip every marker from every element carrying one. Returns how many
    /// elements were touched.
    fn clear_markers(&self) -> usize {
        let names = Marker::attributes();
        let marked = match self.dom.elements_with_any_attribute(&names) {
            Ok(marked) => marked,
            Err(err) => {
                tracing::warn!(%err, "failed to find marked elements");
                return 0;
            }
        };
        for element in &marked {
            for name in names {
                if let Err(err) = self.dom.remove_attribute(element, name) {
                    tracing::warn!(%err, "failed to clear marker");
                }
            }
        }
        marked.len()
    }
}
