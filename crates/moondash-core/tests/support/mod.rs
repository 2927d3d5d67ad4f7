// In-memory recording gateway shared by the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio::sync::Notify;

use moondash_core::{ClientConfig, Collection, Controller, EntityId, FindQuery, Gateway};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Probe,
    Find {
        collection: Collection,
        query: FindQuery,
    },
    Create {
        collection: Collection,
        fields: Value,
    },
    Update {
        collection: Collection,
        id: EntityId,
        fields: Value,
    },
    Login {
        email: String,
    },
    Logout,
    Signup {
        collection: Collection,
        fields: Value,
    },
    CurrentIdentity,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    probe_fails: bool,
    identity: Option<Value>,
    /// Accounts that can log in: email -> (password, record).
    accounts: HashMap<String, (String, Value)>,
    listings: HashMap<Collection, Vec<Value>>,
    failing: Vec<Collection>,
    logout_fails: bool,
    update_fails: bool,
    next_id: u64,
}

/// Update gate: `entered` fires when an update starts, the update
/// then waits for `release`.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // ── Setup ──

    pub fn fail_probe(&self) {
        self.state.lock().unwrap().probe_fails = true;
    }

    pub fn fail_logout(&self) {
        self.state.lock().unwrap().logout_fails = true;
    }

    pub fn fail_updates(&self) {
        self.state.lock().unwrap().update_fails = true;
    }

    pub fn fail_find(&self, collection: Collection) {
        self.state.lock().unwrap().failing.push(collection);
    }

    pub fn heal_find(&self, collection: Collection) {
        self.state.lock().unwrap().failing.retain(|c| *c != collection);
    }

    /// Pretend a session is already established for `user`.
    pub fn sign_in_as(&self, user: Value) {
        self.state.lock().unwrap().identity = Some(user);
    }

    pub fn add_account(&self, email: &str, password: &str, user: Value) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_owned(), (password.to_owned(), user));
    }

    pub fn set_listing(&self, collection: Collection, records: Vec<Value>) {
        self.state
            .lock()
            .unwrap()
            .listings
            .insert(collection, records);
    }

    pub fn gate_updates(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    // ── Inspection ──

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn finds(&self) -> Vec<(Collection, FindQuery)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Find { collection, query } => Some((collection, query)),
                _ => None,
            })
            .collect()
    }

    pub fn creates(&self) -> Vec<(Collection, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { collection, fields } => Some((collection, fields)),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<(EntityId, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update { id, fields, .. } => Some((id, fields)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn http(status: u16, message: &str) -> moondash_api::Error {
    moondash_api::Error::Http {
        status,
        message: message.to_owned(),
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn probe(&self) -> Result<(), moondash_api::Error> {
        self.record(Call::Probe);
        if self.state.lock().unwrap().probe_fails {
            return Err(http(503, "backend down"));
        }
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Value>, moondash_api::Error> {
        self.record(Call::Find {
            collection,
            query: query.clone(),
        });
        let state = self.state.lock().unwrap();
        if state.failing.contains(&collection) {
            return Err(http(500, "query exploded"));
        }
        let records = state.listings.get(&collection).cloned().unwrap_or_default();
        let limit = query.limit.map_or(usize::MAX, |l| l as usize);
        Ok(records.into_iter().take(limit).collect())
    }

    async fn create(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error> {
        self.record(Call::Create {
            collection,
            fields: fields.clone(),
        });
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let mut record = fields.clone();
        record["id"] = json!(format!("new-{}", state.next_id));
        if collection == Collection::LunarRover {
            record["status"] = json!("idle");
        }
        Ok(record)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &EntityId,
        fields: &Value,
    ) -> Result<Value, moondash_api::Error> {
        self.record(Call::Update {
            collection,
            id: id.clone(),
            fields: fields.clone(),
        });

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let state = self.state.lock().unwrap();
        if state.update_fails {
            return Err(http(500, "update rejected"));
        }
        let mut record = state
            .listings
            .get(&collection)
            .and_then(|records| {
                records
                    .iter()
                    .find(|r| r["id"] == id.to_json())
                    .cloned()
            })
            .unwrap_or_else(|| json!({ "id": id.to_json(), "name": "unknown" }));
        if let (Some(target), Some(patch)) = (record.as_object_mut(), fields.as_object()) {
            for (k, v) in patch {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(record)
    }

    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(), moondash_api::Error> {
        self.record(Call::Login {
            email: email.to_owned(),
        });
        let mut state = self.state.lock().unwrap();
        match state.accounts.get(email) {
            Some((expected, user)) if expected == password.expose_secret() => {
                let user = user.clone();
                state.identity = Some(user);
                Ok(())
            }
            _ => Err(moondash_api::Error::Authentication {
                message: "Invalid email or password".into(),
            }),
        }
    }

    async fn logout(&self) -> Result<(), moondash_api::Error> {
        self.record(Call::Logout);
        let mut state = self.state.lock().unwrap();
        state.identity = None;
        if state.logout_fails {
            return Err(http(502, "logout endpoint unavailable"));
        }
        Ok(())
    }

    async fn signup(
        &self,
        collection: Collection,
        fields: &Value,
    ) -> Result<(), moondash_api::Error> {
        self.record(Call::Signup {
            collection,
            fields: fields.clone(),
        });
        let mut state = self.state.lock().unwrap();
        let email = fields["email"].as_str().unwrap_or_default().to_owned();
        if state.accounts.contains_key(&email) {
            return Err(http(409, "email already registered"));
        }
        state.next_id += 1;
        let mut record = fields.clone();
        record["id"] = json!(format!("user-{}", state.next_id));
        let password = record
            .as_object_mut()
            .and_then(|o| o.remove("password"))
            .and_then(|p| p.as_str().map(str::to_owned))
            .unwrap_or_default();
        state.accounts.insert(email, (password, record.clone()));
        state.identity = Some(record);
        Ok(())
    }

    async fn current_identity(&self) -> Result<Value, moondash_api::Error> {
        self.record(Call::CurrentIdentity);
        self.state
            .lock()
            .unwrap()
            .identity
            .clone()
            .ok_or(moondash_api::Error::NoActiveSession)
    }
}

// ── Fixtures ──

pub fn customer() -> Value {
    json!({
        "id": "cust-1",
        "email": "neil@moon.io",
        "name": "Neil",
        "role": "customer",
        "lunarAddress": "Tranquility Base"
    })
}

pub fn driver() -> Value {
    json!({
        "id": 7,
        "email": "val@moon.io",
        "name": "Valentina",
        "role": "driver"
    })
}

pub fn admin() -> Value {
    json!({
        "id": "admin-1",
        "email": "ops@moon.io",
        "name": "Ops",
        "role": "admin"
    })
}

pub fn rover(id: &str, operator: Value, status: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Rover-{id}"),
        "status": status,
        "operatorId": operator
    })
}

pub fn controller(gateway: &Arc<FakeGateway>) -> Controller {
    let config = ClientConfig::from_url_str("http://localhost:1111").unwrap();
    Controller::new(config, Arc::clone(gateway) as Arc<dyn Gateway>)
}
