//! In-memory stores used by the router tests

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use common::error::DatabaseResult;

use super::{OrderStore, OrderTagStore};
use crate::models::{DateRange, NewOrder, NewOrderTag, Order, OrderTag};

#[derive(Default)]
struct Tables {
    orders: Vec<Order>,
    tags: Vec<OrderTag>,
}

/// Shared in-memory tables implementing both order stores
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` report the store as unreachable
    pub fn set_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list(&self) -> DatabaseResult<Vec<Order>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.orders.clone())
    }

    async fn filter_by_date_range(&self, range: &DateRange) -> DatabaseResult<Vec<Order>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .orders
            .iter()
            .filter(|order| {
                order.start_date >= range.start_date && order.embargo_date <= range.embargo_date
            })
            .cloned()
            .collect())
    }

    async fn create(&self, new_order: &NewOrder) -> DatabaseResult<Order> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let order = Order {
            id: tables.orders.len() as i64 + 1,
            start_date: new_order.start_date,
            embargo_date: new_order.embargo_date,
            is_active: new_order.is_active,
            tags: new_order.tags.clone(),
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn deactivate(&self, id: i64) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        match tables.orders.iter_mut().find(|order| order.id == id) {
            Some(order) => {
                order.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        Ok(!self.offline.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl OrderTagStore for MemoryStore {
    async fn list(&self) -> DatabaseResult<Vec<OrderTag>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables.tags.clone())
    }

    async fn create(&self, new_tag: &NewOrderTag) -> DatabaseResult<OrderTag> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let tag = OrderTag {
            id: tables.tags.len() as i64 + 1,
            name: new_tag.name.clone(),
        };
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn missing_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<i64>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !tables.tags.iter().any(|tag| tag.id == *id))
            .collect())
    }
}
