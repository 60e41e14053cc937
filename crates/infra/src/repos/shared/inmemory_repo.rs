use super::repo::UpdateResult;
use dory_reminder_domain::Entity;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

pub fn save<T: Clone + Entity<i64>>(val: &T, collection: &Mutex<Vec<T>>) -> UpdateResult {
    let mut collection = lock(collection);
    let mut updated_count = 0;
    for item in collection.iter_mut() {
        if item.id() == val.id() {
            *item = val.clone();
            updated_count += 1;
        }
    }
    UpdateResult { updated_count }
}

/// Replaces the entity with the same id or appends it
pub fn upsert<T: Clone + Entity<i64>>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = lock(collection);
    match collection.iter_mut().find(|item| item.id() == val.id()) {
        Some(item) => *item = val.clone(),
        None => collection.push(val.clone()),
    }
}

pub fn find<T: Clone + Entity<i64>>(val_id: i64, collection: &Mutex<Vec<T>>) -> Option<T> {
    lock(collection)
        .iter()
        .find(|item| item.id() == val_id)
        .cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity<i64>>(val_id: i64, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = lock(collection);
    let index = collection.iter().position(|item| item.id() == val_id)?;
    Some(collection.remove(index))
}
