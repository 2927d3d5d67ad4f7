//! `moondash dashboard`: the role view for the logged-in user.

use std::fmt::Write;

use tabled::Tabled;

use moondash_core::{
    AdminView, CustomerView, DriverView, OrderRow, Outpost, RoleView, User, order_rows,
    rover_badge,
};

use super::connect;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, paint_badge, render_table, should_color};

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OutpostRow {
    #[tabled(rename = "Outpost")]
    name: String,
    #[tabled(rename = "Cuisine")]
    cuisine: String,
    #[tabled(rename = "Menu image")]
    image: String,
}

impl From<&Outpost> for OutpostRow {
    fn from(o: &Outpost) -> Self {
        Self {
            name: o.name.clone(),
            cuisine: o.cuisine.clone().unwrap_or_else(|| "-".into()),
            image: o.image_url().to_owned(),
        }
    }
}

#[derive(Tabled)]
struct CustomerOrderRow {
    #[tabled(rename = "Order")]
    id: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Rover")]
    rover: String,
}

impl From<&OrderRow> for CustomerOrderRow {
    fn from(r: &OrderRow) -> Self {
        Self {
            id: format!("#{}", r.short_id),
            total: r.price_label(),
            status: r.badge.label.clone(),
            rover: r.rover.clone(),
        }
    }
}

#[derive(Tabled)]
struct DeliveryRow {
    #[tabled(rename = "Order")]
    id: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&OrderRow> for DeliveryRow {
    fn from(r: &OrderRow) -> Self {
        Self {
            id: format!("#{}", r.short_id),
            customer: r.customer.clone(),
            address: r.address.clone(),
            status: r.badge.label.clone(),
        }
    }
}

#[derive(Tabled)]
struct OperatorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for OperatorRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

// ── Detail renderers ─────────────────────────────────────────────────

fn customer_detail(view: &CustomerView) -> String {
    let outposts: Vec<OutpostRow> = view.outposts.iter().map(OutpostRow::from).collect();
    let orders: Vec<CustomerOrderRow> = order_rows(&view.orders)
        .iter()
        .map(CustomerOrderRow::from)
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Outposts\n{}", render_table(&outposts));
    let _ = write!(out, "\nYour orders\n{}", render_table(&orders));
    out
}

fn driver_detail(view: &DriverView, color: bool) -> String {
    let Some(ref rover) = view.rover else {
        return "No rover assigned. Ask an admin to create one for you.".into();
    };

    let deliveries: Vec<DeliveryRow> = order_rows(&view.deliveries)
        .iter()
        .map(DeliveryRow::from)
        .collect();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rover:  {} [{}]",
        rover.name,
        paint_badge(&rover_badge(rover.status), color)
    );
    let _ = write!(out, "\nDeliveries\n{}", render_table(&deliveries));
    out
}

fn admin_detail(view: &AdminView, console: &str) -> String {
    let operators: Vec<OperatorRow> = view.operators.iter().map(OperatorRow::from).collect();
    let mut out = String::new();
    let _ = writeln!(out, "Drivers\n{}", render_table(&operators));
    let _ = write!(out, "\nAdmin console: {console}");
    out
}

fn with_loaded_footer(mut body: String, loaded: Option<&str>) -> String {
    if let Some(at) = loaded {
        let _ = write!(body, "\n\nLoaded {at}");
    }
    body
}

fn plain_ids(view: &RoleView) -> String {
    let ids: Vec<String> = match view {
        RoleView::Customer(v) => v.orders.iter().map(|o| o.id.to_string()).collect(),
        RoleView::Driver(v) => v.deliveries.iter().map(|o| o.id.to_string()).collect(),
        RoleView::Admin(v) => v.operators.iter().map(|u| u.id.to_string()).collect(),
    };
    ids.join("\n")
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = connect(global).await?;
    if ctx.controller.current_user().is_none() {
        return Err(CliError::NotLoggedIn);
    }

    // Startup keeps going when the load fails; ask again to get the error.
    let view = match ctx.controller.view() {
        Some(view) => view,
        None => {
            ctx.controller.refresh().await?;
            ctx.controller.view().ok_or(CliError::NotLoggedIn)?
        }
    };

    let color = matches!(global.output, OutputFormat::Table) && should_color(&global.color);
    let console = ctx.controller.admin_console_url()?;
    let loaded = ctx
        .controller
        .store()
        .last_loaded()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
    let out = output::render_single(
        &global.output,
        view.as_ref(),
        |v| {
            let body = match v {
                RoleView::Customer(c) => customer_detail(c),
                RoleView::Driver(d) => driver_detail(d, color),
                RoleView::Admin(a) => admin_detail(a, console.as_str()),
            };
            with_loaded_footer(body, loaded.as_deref())
        },
        plain_ids,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn footer_shows_load_time_when_known() {
        let out = with_loaded_footer("Drivers".into(), Some("2026-10-19 08:00:00 UTC"));
        assert!(out.ends_with("Loaded 2026-10-19 08:00:00 UTC"));
        assert_eq!(with_loaded_footer("Drivers".into(), None), "Drivers");
    }

    #[test]
    fn driver_without_rover_says_so() {
        let out = driver_detail(&DriverView::default(), false);
        assert!(out.contains("No rover assigned"));
    }

    #[test]
    fn customer_detail_lists_orders_in_order() {
        let view: CustomerView = CustomerView {
            outposts: vec![serde_json::from_value(json!({"id": 1, "name": "Crater Cafe"})).unwrap()],
            orders: vec![
                serde_json::from_value(json!({"id": "aaaaaaaa11", "status": "placed"})).unwrap(),
                serde_json::from_value(json!({"id": "bbbbbbbb22", "status": "delivered"})).unwrap(),
            ],
        };
        let out = customer_detail(&view);
        let placed = out.find("#aaaaaaaa").unwrap();
        let delivered = out.find("#bbbbbbbb").unwrap();
        assert!(placed < delivered);
        assert!(out.contains("PLACED"));
        assert!(out.contains("Crater Cafe"));
    }
}
