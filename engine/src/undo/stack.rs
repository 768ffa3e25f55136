//! Undo and redo history

use super::commands::Command;
use crate::scene::Scene;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Executed commands that can be undone and undone commands that can be redone
///
/// Executing a new command discards the redo history. With a capacity set,
/// the oldest undo entries are dropped once it is exceeded.
#[derive(Debug, Default)]
pub struct CommandStack {
    undo: VecDeque<Command>,
    redo: Vec<Command>,
    capacity: Option<usize>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack keeping at most `capacity` undo entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Execute a command and record it
    ///
    /// Commands that degrade to a no-op are not recorded. Returns whether the
    /// command was applied.
    pub fn execute(&mut self, scene: &mut Scene, command: Command) -> bool {
        if !command.execute(scene) {
            return false;
        }
        self.record(command);
        true
    }

    /// Record a command whose effect is already applied
    pub fn record(&mut self, command: Command) {
        trace!(entity = %command.entity(), kind = ?command.kind(), "Recording command");
        self.undo.push_back(command);
        self.redo.clear();
        if let Some(capacity) = self.capacity {
            while self.undo.len() > capacity {
                self.undo.pop_front();
            }
        }
    }

    /// Revert the most recent command; returns false if there was none
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.undo.pop_back() else {
            return false;
        };
        command.unexecute(scene);
        debug!(entity = %command.entity(), kind = ?command.kind(), "Undo");
        self.redo.push(command);
        true
    }

    /// Re-apply the most recently undone command; returns false if there was none
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(command) = self.redo.pop() else {
            return false;
        };
        command.execute(scene);
        debug!(entity = %command.entity(), kind = ?command.kind(), "Redo");
        self.undo.push_back(command);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, NameComponent};
    use crate::undo::ComponentState;

    fn rename(scene: &Scene, entity: Entity, name: &str) -> Command {
        Command::change_component_state(scene, entity, ComponentState::Name(NameComponent::new(name)))
            .unwrap()
    }

    fn name_of(scene: &Scene, entity: Entity) -> String {
        scene.get::<NameComponent>(entity).unwrap().0.clone()
    }

    #[test]
    fn test_undo_redo_order() {
        let mut scene = Scene::default();
        let entity = scene.create_entity();
        scene.add(entity, NameComponent::new("a")).unwrap();
        let mut stack = CommandStack::new();

        let first = rename(&scene, entity, "b");
        stack.execute(&mut scene, first);
        let second = rename(&scene, entity, "c");
        stack.execute(&mut scene, second);

        assert!(stack.undo(&mut scene));
        assert_eq!(name_of(&scene, entity), "b");
        assert!(stack.undo(&mut scene));
        assert_eq!(name_of(&scene, entity), "a");
        assert!(!stack.undo(&mut scene));

        assert!(stack.redo(&mut scene));
        assert!(stack.redo(&mut scene));
        assert_eq!(name_of(&scene, entity), "c");
        assert!(!stack.redo(&mut scene));
    }

    #[test]
    fn test_new_command_discards_redo() {
        let mut scene = Scene::default();
        let entity = scene.create_entity();
        scene.add(entity, NameComponent::new("a")).unwrap();
        let mut stack = CommandStack::new();

        let command = rename(&scene, entity, "b");
        stack.execute(&mut scene, command);
        stack.undo(&mut scene);
        assert!(stack.can_redo());

        let command = rename(&scene, entity, "z");
        stack.execute(&mut scene, command);
        assert!(!stack.can_redo());
        assert!(!stack.redo(&mut scene));
        assert_eq!(name_of(&scene, entity), "z");
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut scene = Scene::default();
        let entity = scene.create_entity();
        scene.add(entity, NameComponent::new("0")).unwrap();
        let mut stack = CommandStack::with_capacity(2);

        for name in ["1", "2", "3"] {
            let command = rename(&scene, entity, name);
            stack.execute(&mut scene, command);
        }
        assert_eq!(stack.undo_len(), 2);
        stack.undo(&mut scene);
        stack.undo(&mut scene);
        assert_eq!(name_of(&scene, entity), "1");
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_noop_command_is_not_recorded() {
        let mut scene = Scene::default();
        let entity = scene.create_entity();
        scene.add(entity, NameComponent::new("a")).unwrap();
        let command = rename(&scene, entity, "b");
        scene.destroy_entity(entity).unwrap();

        let mut stack = CommandStack::new();
        assert!(!stack.execute(&mut scene, command));
        assert_eq!(stack.undo_len(), 0);
    }
}
