use log::{debug, trace};

use super::{
    AnalysisTool, ClippingPlaneLocator, Locator, LocatorState, ToolCapabilities, ToolEvent,
    ToolId,
};
use crate::clipping::ClippingPlanePool;
use crate::math::Mat4;

/// Owns the clipping-plane pool and the locators created from tools.
///
/// All calls arrive already serialized from the host, one at a time.
/// Destroying a locator here is the only way a slot returns to the pool,
/// apart from [`clear`](Self::clear).
#[derive(Debug)]
pub struct ToolLifecycleManager {
    pool: ClippingPlanePool,
    locators: Vec<Box<dyn Locator>>,
    analysis_tool: Option<AnalysisTool>,
}

impl ToolLifecycleManager {
    /// A manager with a pool of `planes` slots and the clipping-plane
    /// analysis tool selected.
    pub fn new(planes: usize) -> Self {
        Self::with_pool(ClippingPlanePool::new(planes))
    }

    pub fn with_pool(pool: ClippingPlanePool) -> Self {
        Self {
            pool,
            locators: Vec::new(),
            analysis_tool: Some(AnalysisTool::ClippingPlane),
        }
    }

    pub fn pool(&self) -> &ClippingPlanePool {
        &self.pool
    }

    /// Behaviour given to locator tools created from now on; tools that
    /// already have a locator keep theirs. `None` creates no locators.
    pub fn set_analysis_tool(&mut self, analysis_tool: Option<AnalysisTool>) {
        self.analysis_tool = analysis_tool;
    }

    pub fn analysis_tool(&self) -> Option<AnalysisTool> {
        self.analysis_tool
    }

    /// Live locators in creation order.
    pub fn locators(&self) -> impl ExactSizeIterator<Item = &dyn Locator> + '_ {
        self.locators.iter().map(|locator| locator.as_ref())
    }

    pub fn locator(&self, tool: ToolId) -> Option<&dyn Locator> {
        self.position(tool).map(|i| self.locators[i].as_ref())
    }

    pub fn locator_state(&self, tool: ToolId) -> Option<LocatorState> {
        self.locator(tool).map(|locator| locator.state(&self.pool))
    }

    /// Dispatch a host notification.
    pub fn handle(&mut self, event: ToolEvent) {
        trace!("{}: {event:?}", event.tool());
        match event {
            ToolEvent::Created { tool, capabilities } => {
                self.on_tool_created(tool, capabilities);
            }
            ToolEvent::Destroyed { tool } => {
                self.on_tool_destroyed(tool);
            }
            ToolEvent::ButtonPress { tool } => self.button_press(tool),
            ToolEvent::ButtonRelease { tool } => self.button_release(tool),
            ToolEvent::Motion { tool, transform } => self.motion(tool, &transform),
        }
    }

    /// Create a locator for `tool` if it can locate, an analysis tool is
    /// selected and the tool has no locator yet. Returns whether a locator
    /// was created.
    pub fn on_tool_created(&mut self, tool: ToolId, capabilities: ToolCapabilities) -> bool {
        if !capabilities.contains(ToolCapabilities::LOCATOR) {
            return false;
        }
        if self.position(tool).is_some() {
            debug!("{tool} already has a locator");
            return false;
        }
        let Some(analysis_tool) = self.analysis_tool else {
            debug!("{tool} created with no analysis tool selected");
            return false;
        };

        let locator: Box<dyn Locator> = match analysis_tool {
            AnalysisTool::ClippingPlane => Box::new(ClippingPlaneLocator::new(tool, &mut self.pool)),
        };
        debug!("{tool} is now a {} locator", analysis_tool.name());
        self.locators.push(locator);
        true
    }

    /// Destroy the locator bound to `tool`, if there is one. Returns whether
    /// a locator was destroyed.
    pub fn on_tool_destroyed(&mut self, tool: ToolId) -> bool {
        let Some(index) = self.position(tool) else {
            return false;
        };
        let locator = self.locators.remove(index);
        locator.destroy(&mut self.pool);
        debug!("{tool} destroyed, {} locator(s) left", self.locators.len());
        true
    }

    pub fn button_press(&mut self, tool: ToolId) {
        if let Some(index) = self.position(tool) {
            self.locators[index].button_press(&mut self.pool);
        }
    }

    pub fn button_release(&mut self, tool: ToolId) {
        if let Some(index) = self.position(tool) {
            self.locators[index].button_release(&mut self.pool);
        }
    }

    pub fn motion(&mut self, tool: ToolId, transform: &Mat4) {
        if let Some(index) = self.position(tool) {
            self.locators[index].motion(&mut self.pool, transform);
        }
    }

    /// Destroy every locator, returning all slots to the pool.
    pub fn clear(&mut self) {
        for locator in self.locators.drain(..) {
            locator.destroy(&mut self.pool);
        }
    }

    fn position(&self, tool: ToolId) -> Option<usize> {
        self.locators.iter().position(|locator| locator.tool() == tool)
    }
}

impl Drop for ToolLifecycleManager {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipping::SlotId;
    use crate::math::Vec3;
    use proptest::prelude::*;

    fn create(manager: &mut ToolLifecycleManager, id: u32) -> bool {
        manager.on_tool_created(ToolId(id), ToolCapabilities::LOCATOR)
    }

    fn slot_of(manager: &ToolLifecycleManager, id: u32) -> Option<usize> {
        manager
            .locator(ToolId(id))?
            .clipping_plane()
            .map(SlotId::index)
    }

    #[test]
    fn only_locator_tools_get_locators() {
        let mut manager = ToolLifecycleManager::new(6);
        assert!(!manager.on_tool_created(ToolId(1), ToolCapabilities::NAVIGATION));
        assert!(!manager.on_tool_created(
            ToolId(3),
            ToolCapabilities::DRAGGER | ToolCapabilities::MENU
        ));
        assert!(manager.on_tool_created(
            ToolId(2),
            ToolCapabilities::LOCATOR | ToolCapabilities::MENU
        ));
        assert_eq!(manager.locators().len(), 1);
        assert_eq!(manager.pool().allocated_count(), 1);
    }

    #[test]
    fn no_analysis_tool_means_no_locator() {
        let mut manager = ToolLifecycleManager::new(6);
        manager.set_analysis_tool(None);
        assert!(!create(&mut manager, 1));
        assert_eq!(manager.pool().allocated_count(), 0);
    }

    #[test]
    fn locators_keep_creation_order() {
        let mut manager = ToolLifecycleManager::new(6);
        for id in [7, 3, 5] {
            create(&mut manager, id);
        }
        let tools: Vec<_> = manager.locators().map(|l| l.tool().0).collect();
        assert_eq!(tools, vec![7, 3, 5]);
        assert_eq!(slot_of(&manager, 3), Some(1));
    }

    #[test]
    fn repeated_creation_keeps_the_first_locator() {
        let mut manager = ToolLifecycleManager::new(6);
        assert!(create(&mut manager, 1));
        assert!(!create(&mut manager, 1));
        assert_eq!(manager.locators().len(), 1);
        assert_eq!(manager.pool().allocated_count(), 1);

        assert!(manager.on_tool_destroyed(ToolId(1)));
        assert_eq!(manager.pool().allocated_count(), 0);
        assert!(manager.locator(ToolId(1)).is_none());
    }

    #[test]
    fn live_locators_never_share_a_slot() {
        let mut manager = ToolLifecycleManager::new(2);
        create(&mut manager, 1);
        create(&mut manager, 2);
        manager.on_tool_destroyed(ToolId(1));
        create(&mut manager, 3);

        assert_eq!(slot_of(&manager, 3), Some(0));
        assert_eq!(slot_of(&manager, 2), Some(1));
        assert!(create(&mut manager, 4));
        assert_eq!(slot_of(&manager, 4), None);
        assert_eq!(manager.pool().allocated_count(), 2);
    }

    #[test]
    fn destroying_tool_releases_its_slot() {
        let mut manager = ToolLifecycleManager::new(2);
        create(&mut manager, 1);
        create(&mut manager, 2);
        manager.button_press(ToolId(2));

        assert!(manager.on_tool_destroyed(ToolId(2)));
        assert_eq!(manager.locator(ToolId(2)).map(|l| l.tool()), None);
        assert_eq!(manager.pool().allocated_count(), 1);
        assert_eq!(manager.pool().active_count(), 0);

        // The freed slot goes to the next locator
        create(&mut manager, 3);
        assert_eq!(manager.locator_state(ToolId(3)), Some(LocatorState::Inactive));
    }

    #[test]
    fn unknown_tool_is_ignored() {
        let mut manager = ToolLifecycleManager::new(2);
        create(&mut manager, 1);
        assert!(!manager.on_tool_destroyed(ToolId(99)));
        manager.button_press(ToolId(99));
        manager.motion(ToolId(99), &Mat4::identity());
        assert_eq!(manager.locators().len(), 1);
        assert_eq!(manager.pool().active_count(), 0);
    }

    #[test]
    fn exhaustion_is_observable_and_recoverable() {
        let mut manager = ToolLifecycleManager::new(1);
        create(&mut manager, 1);
        create(&mut manager, 2);
        assert_eq!(manager.locator_state(ToolId(2)), Some(LocatorState::Unbound));

        // An unbound locator stays unbound even once a slot frees up
        manager.on_tool_destroyed(ToolId(1));
        manager.button_press(ToolId(2));
        assert_eq!(manager.locator_state(ToolId(2)), Some(LocatorState::Unbound));
        assert_eq!(manager.pool().allocated_count(), 0);
    }

    #[test]
    fn events_drive_the_whole_lifecycle() {
        let mut manager = ToolLifecycleManager::new(6);
        let tool = ToolId(4);
        manager.handle(ToolEvent::Created {
            tool,
            capabilities: ToolCapabilities::LOCATOR,
        });
        manager.handle(ToolEvent::ButtonPress { tool });
        manager.handle(ToolEvent::Motion {
            tool,
            transform: Mat4::translation(Vec3::new(0.0, 1.0, 0.0)),
        });
        assert_eq!(manager.locator_state(tool), Some(LocatorState::Active));
        let (_, plane) = manager.pool().slots().next().unwrap();
        assert_eq!(plane.plane().offset, 1.0);

        manager.handle(ToolEvent::ButtonRelease { tool });
        assert_eq!(manager.locator_state(tool), Some(LocatorState::Inactive));
        manager.handle(ToolEvent::Destroyed { tool });
        assert_eq!(manager.locator_state(tool), None);
        assert_eq!(manager.pool().allocated_count(), 0);
    }

    #[test]
    fn clear_releases_everything() {
        let mut manager = ToolLifecycleManager::new(3);
        for id in 0..5 {
            create(&mut manager, id);
            manager.button_press(ToolId(id));
        }
        manager.clear();
        assert_eq!(manager.locators().len(), 0);
        assert_eq!(manager.pool().allocated_count(), 0);
    }

    proptest! {
        #[test]
        fn bound_locators_match_allocated_slots(
            ops in prop::collection::vec((0..4u8, 0..6u32), 0..80)
        ) {
            let mut manager = ToolLifecycleManager::new(3);
            for (op, id) in ops {
                let tool = ToolId(id);
                match op {
                    0 if manager.locator(tool).is_none() => {
                        create(&mut manager, id);
                    }
                    1 => {
                        manager.on_tool_destroyed(tool);
                    }
                    2 => manager.button_press(tool),
                    _ => manager.button_release(tool),
                }
                let bound = manager
                    .locators()
                    .filter(|l| l.state(manager.pool()) != LocatorState::Unbound)
                    .count();
                let active = manager
                    .locators()
                    .filter(|l| l.state(manager.pool()) == LocatorState::Active)
                    .count();
                prop_assert_eq!(bound, manager.pool().allocated_count());
                prop_assert_eq!(active, manager.pool().active_count());
            }
        }
    }
}
