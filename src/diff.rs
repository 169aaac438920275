//! Old-list/new-list comparison for recipe lists.

use crate::data::database::FavoritesEntity;
use crate::model::Recipe;

/// Items with a stable identity across refreshes
pub trait Identifiable {
    fn identity(&self) -> i64;
}

impl Identifiable for Recipe {
    fn identity(&self) -> i64 {
        self.recipe_id
    }
}

impl Identifiable for FavoritesEntity {
    fn identity(&self) -> i64 {
        self.id
    }
}

/// Identities that changed between two lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub inserted: Vec<i64>,
    pub removed: Vec<i64>,
    pub changed: Vec<i64>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

pub struct RecipesDiff<'a, T> {
    old_list: &'a [T],
    new_list: &'a [T],
}

impl<'a, T> RecipesDiff<'a, T>
where
    T: Identifiable + PartialEq,
{
    pub fn new(old_list: &'a [T], new_list: &'a [T]) -> Self {
        Self { old_list, new_list }
    }

    pub fn old_list_size(&self) -> usize {
        self.old_list.len()
    }

    pub fn new_list_size(&self) -> usize {
        self.new_list.len()
    }

    pub fn are_items_the_same(&self, old_position: usize, new_position: usize) -> bool {
        self.old_list[old_position].identity() == self.new_list[new_position].identity()
    }

    pub fn are_contents_the_same(&self, old_position: usize, new_position: usize) -> bool {
        self.old_list[old_position] == self.new_list[new_position]
    }

    /// Compare both lists by identity, in new-list order.
    ///
    /// Quadratic, which is fine for API pages of at most a hundred items.
    pub fn calculate(&self) -> DiffResult {
        let mut result = DiffResult::default();

        for new_position in 0..self.new_list_size() {
            let matching = (0..self.old_list_size())
                .find(|&old_position| self.are_items_the_same(old_position, new_position));

            match matching {
                Some(old_position) => {
                    if !self.are_contents_the_same(old_position, new_position) {
                        result.changed.push(self.new_list[new_position].identity());
                    }
                }
                None => result.inserted.push(self.new_list[new_position].identity()),
            }
        }

        for old_item in self.old_list {
            let id = old_item.identity();
            if !self.new_list.iter().any(|item| item.identity() == id) {
                result.removed.push(id);
            }
        }

        result
    }
}
