// ── Role dispatcher ──
//
// Picks the loading strategy for the logged-in role and issues the
// minimum query set for it. Nothing is fetched for other roles.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::command::RoverDraft;
use crate::error::CoreError;
use crate::gateway::{Collection, FindQuery, Gateway, decode_all};
use crate::model::{Order, Outpost, Role, Rover, User};
use crate::view::{AdminView, CustomerView, DriverView, RoleView};

#[derive(Clone)]
pub struct RoleDispatcher {
    gateway: Arc<dyn Gateway>,
}

impl RoleDispatcher {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    /// Load the dashboard data for `user`'s role.
    ///
    /// Any failed query yields [`CoreError::QueryFailure`]; the caller
    /// decides what to keep. Individual malformed records are skipped.
    pub async fn load_for_role(&self, user: &User) -> Result<RoleView, CoreError> {
        debug!(user = %user.id, role = %user.role, "loading role view");
        match user.role {
            Role::Customer => self.load_customer(user).await.map(RoleView::Customer),
            Role::Driver => self.load_driver(user).await.map(RoleView::Driver),
            Role::Admin => self.load_admin().await.map(RoleView::Admin),
        }
    }

    async fn load_customer(&self, user: &User) -> Result<CustomerView, CoreError> {
        let orders_query = FindQuery::new()
            .filter("customerId", user.id.to_json())
            .relation("rover");
        let all = FindQuery::new();

        let (outposts, orders) = tokio::try_join!(
            self.query::<Outpost>(Collection::LunarOutpost, &all),
            self.query::<Order>(Collection::Order, &orders_query),
        )?;

        Ok(CustomerView { outposts, orders })
    }

    async fn load_driver(&self, user: &User) -> Result<DriverView, CoreError> {
        let rover_query = FindQuery::new()
            .filter("operatorId", user.id.to_json())
            .limit(1);
        let rover = self
            .query::<Rover>(Collection::LunarRover, &rover_query)
            .await?
            .into_iter()
            .next();

        let Some(rover) = rover else {
            debug!(user = %user.id, "no rover assigned");
            return Ok(DriverView::default());
        };

        let orders_query = FindQuery::new()
            .filter("roverId", rover.id.to_json())
            .relation("customer");
        let deliveries = self.query::<Order>(Collection::Order, &orders_query).await?;

        Ok(DriverView {
            rover: Some(rover),
            deliveries,
        })
    }

    async fn load_admin(&self) -> Result<AdminView, CoreError> {
        let query = FindQuery::new().filter("role", Role::Driver.to_string());
        let operators = self.query::<User>(Collection::User, &query).await?;
        Ok(AdminView {
            operators,
            draft: RoverDraft::default(),
        })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<T>, CoreError> {
        let raw = self.gateway.find(collection, query).await.map_err(|e| {
            CoreError::QueryFailure {
                collection: collection.as_str().to_owned(),
                message: CoreError::from(e).to_string(),
            }
        })?;
        Ok(decode_all(collection, raw))
    }
}
