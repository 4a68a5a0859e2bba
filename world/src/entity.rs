//! Draw-ordered entity storage.

use std::mem;

use feles_core::{Archetype, EntityId, EntitySnapshot};

use crate::{body::Body, components::Component};

/// Read-only view of the other party in a collision.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Contact {
    pub(crate) id: EntityId,
    pub(crate) body: Body,
}

#[derive(Debug)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) archetype: Archetype,
    pub(crate) draw_priority: i32,
    pub(crate) body: Body,
    pub(crate) components: Vec<Component>,
}

impl Entity {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            archetype: self.archetype,
            position: self.body.position,
            radius: self.body.radius,
            collision: self.body.collision,
            draw_priority: self.draw_priority,
            pose: self.body.pose,
            frame: self.body.frame,
            hidden: self.body.hidden,
        }
    }
}

/// Entities ordered by ascending draw priority, ties in insertion order.
#[derive(Debug, Default)]
pub(crate) struct EntityList {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityList {
    /// Stores a new entity and returns its freshly allocated identifier.
    pub(crate) fn insert(
        &mut self,
        archetype: Archetype,
        draw_priority: i32,
        body: Body,
        components: Vec<Component>,
    ) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let index = self
            .entities
            .iter()
            .position(|entity| entity.draw_priority > draw_priority)
            .unwrap_or(self.entities.len());
        self.entities.insert(
            index,
            Entity {
                id,
                archetype,
                draw_priority,
                body,
                components,
            },
        );
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.entities.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub(crate) fn contact(&self, index: usize) -> Option<Contact> {
        self.entities.get(index).map(|entity| Contact {
            id: entity.id,
            body: entity.body,
        })
    }

    /// Lends out the body and components of the entity at `index`.
    ///
    /// The entity stays in place with no components until [`Self::checkin`].
    pub(crate) fn checkout(&mut self, index: usize) -> Option<(EntityId, Body, Vec<Component>)> {
        self.entities
            .get_mut(index)
            .map(|entity| (entity.id, entity.body, mem::take(&mut entity.components)))
    }

    pub(crate) fn checkin(&mut self, index: usize, body: Body, components: Vec<Component>) {
        if let Some(entity) = self.entities.get_mut(index) {
            entity.body = body;
            entity.components = components;
        }
    }

    /// Drops every entity flagged for removal, in list order.
    pub(crate) fn purge(&mut self) -> Vec<(EntityId, Archetype)> {
        let mut removed = Vec::new();
        self.entities.retain(|entity| {
            if entity.body.pending_removal {
                removed.push((entity.id, entity.archetype));
                false
            } else {
                true
            }
        });
        removed
    }
}
