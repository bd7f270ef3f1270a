use yatube_shared::dto::GroupResponse;

use crate::domain::Group;

/// Read-only projection of a group.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSerializer;

impl GroupSerializer {
    pub fn render(&self, group: Group) -> GroupResponse {
        GroupResponse {
            id: group.id,
            title: group.title,
            slug: group.slug,
            description: group.description,
        }
    }
}
