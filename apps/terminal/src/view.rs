//! # Text Views
//!
//! Plain-text rendering of command responses. All amounts go through
//! [`ConfigState::format_currency`]. Help and usage text come from the
//! command parser.

use std::fmt::Write as _;

use lomi_core::{CartSnapshot, Fulfillment, Order, OrderType, PaymentMethod, PaymentStep};

use crate::commands::auth::StaffMember;
use crate::commands::payment::CheckoutResponse;
use crate::commands::product::ProductDto;
use crate::commands::report::OrderSummary;
use crate::state::{ConfigState, SalesReport};

pub fn products(products: &[ProductDto], config: &ConfigState) -> String {
    if products.is_empty() {
        return "No products match".to_string();
    }

    let mut out = String::new();
    for p in products {
        let _ = write!(
            out,
            "{:<18} {:<28} {:>12}",
            p.id,
            p.name,
            config.format_currency(p.price)
        );
        if p.is_best_seller {
            out.push_str("  ★");
        }
        if !p.is_available {
            out.push_str("  (sold out)");
        }
        out.push('\n');
        for (id, name, price) in &p.extras {
            let _ = writeln!(out, "    + {:<20} {:<22} {:>10}", id, name, config.format_currency(*price));
        }
        for (id, name) in &p.exclusions {
            let _ = writeln!(out, "    - {:<20} {}", id, name);
        }
    }
    out.trim_end().to_string()
}

pub fn cart(cart: &CartSnapshot, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = write!(out, "Order type: {}", cart.order_type.as_str());
    match cart.order_type {
        OrderType::DineIn => {
            if let Some(table) = cart.table_number {
                let _ = write!(out, "  table {}", table);
            }
        }
        OrderType::Takeaway | OrderType::Delivery => {
            if let Some(customer) = &cart.customer {
                let _ = write!(out, "  {} ({})", customer.name, customer.phone);
                if let Some(address) = &customer.address {
                    let _ = write!(out, ", {}", address);
                }
            }
        }
    }
    out.push('\n');

    if cart.lines.is_empty() {
        out.push_str("Cart is empty");
        return out;
    }

    for (i, line) in cart.lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<28} x{:<3} {:>12}",
            i + 1,
            line.product.name,
            line.quantity,
            config.format_currency(line.line_total())
        );
        for extra in &line.extras {
            let _ = writeln!(out, "      + {}", extra.name);
        }
        for exclusion in &line.exclusions {
            let _ = writeln!(out, "      - {}", exclusion.name);
        }
        if let Some(notes) = &line.notes {
            let _ = writeln!(out, "      \"{}\"", notes);
        }
    }

    let totals = &cart.totals;
    let _ = writeln!(out, "Subtotal {:>37}", config.format_currency(totals.subtotal));
    let _ = writeln!(
        out,
        "IVA ({}%) {:>36}",
        config.tax_rate.percentage(),
        config.format_currency(totals.tax)
    );
    if !totals.delivery_fee.is_zero() {
        let _ = writeln!(out, "Delivery {:>37}", config.format_currency(totals.delivery_fee));
    }
    let _ = write!(out, "TOTAL {:>40}", config.format_currency(totals.total));
    out
}

pub fn checkout(panel: &CheckoutResponse, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total due: {}", config.format_currency(panel.totals.total));

    match panel.step {
        PaymentStep::CollectingPayment => {
            let _ = write!(out, "Payment method: {}", panel.method.as_str());
            if panel.method == PaymentMethod::Cash {
                match panel.tendered {
                    Some(tendered) => {
                        let _ = write!(
                            out,
                            "\nReceived: {}  Change: {}",
                            config.format_currency(tendered),
                            config.format_currency(panel.change)
                        );
                    }
                    None => out.push_str("\nEnter the amount received: method cash <amount>"),
                }
            }
            out.push_str("\nThen `next`");
        }
        PaymentStep::CollectingDocument => {
            let _ = write!(out, "Document: {}", panel.document_type.as_str());
            if panel.document_type.requires_billing() {
                let _ = write!(
                    out,
                    "\nBilling: {} / {}",
                    or_dash(&panel.billing_name),
                    or_dash(&panel.billing_tax_id)
                );
            }
            out.push_str("\n`confirm` to finish, `back` to change the payment");
        }
        PaymentStep::Completed => out.push_str("Payment completed"),
    }
    out
}

pub fn receipt(order: &Order, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", config.store_name);
    let _ = writeln!(
        out,
        "Order {}  {}",
        order.number,
        order
            .created_at
            .with_timezone(&chrono::Local)
            .format("%d/%m/%Y %H:%M")
    );
    match &order.fulfillment {
        Fulfillment::DineIn { table_number } => match table_number {
            Some(table) => {
                let _ = writeln!(out, "Salon, table {}", table);
            }
            None => out.push_str("Salon\n"),
        },
        Fulfillment::Takeaway { customer_name } => {
            let _ = writeln!(out, "Takeaway {}", customer_name.as_deref().unwrap_or_default());
        }
        Fulfillment::Delivery {
            customer_name,
            customer_phone,
            customer_address,
        } => {
            let _ = writeln!(
                out,
                "Delivery to {} ({}), {}",
                customer_name, customer_phone, customer_address
            );
        }
    }
    for line in &order.lines {
        let _ = writeln!(
            out,
            "  {} x{} {:>12}",
            line.product.name,
            line.quantity,
            config.format_currency(line.line_total())
        );
    }
    let _ = writeln!(out, "Subtotal {}", config.format_currency(order.subtotal));
    let _ = writeln!(out, "IVA {}", config.format_currency(order.tax));
    if !order.delivery_fee.is_zero() {
        let _ = writeln!(out, "Delivery {}", config.format_currency(order.delivery_fee));
    }
    let _ = writeln!(out, "TOTAL {}", config.format_currency(order.total));
    let _ = write!(out, "Paid by {}", order.payment_method.as_str());
    if let (Some(tendered), Some(change)) = (order.amount_tendered, order.change) {
        let _ = write!(
            out,
            ", received {}, change {}",
            config.format_currency(tendered),
            config.format_currency(change)
        );
    }
    if let Some(billing) = &order.billing {
        let _ = write!(out, "\nInvoice to {} ({})", billing.name, billing.tax_id);
    }
    let _ = write!(out, "\nCashier: {}", order.cashier_name);
    if let Some(minutes) = order.preparation_estimate() {
        let _ = write!(out, "\nReady in about {} min", minutes);
    }
    out
}

pub fn history(orders: &[OrderSummary], queue: &[OrderSummary], config: &ConfigState) -> String {
    if orders.is_empty() {
        return "No orders yet".to_string();
    }

    let mut out = String::new();
    for o in orders {
        let _ = writeln!(
            out,
            "{} {} {:<9} {:<8} {:>2}u {:>12}  {}",
            o.time,
            o.number,
            o.order_type.as_str(),
            o.payment_method.as_str(),
            o.unit_count,
            config.format_currency(o.total),
            o.cashier_name
        );
    }
    let _ = write!(out, "Kitchen queue: {}", queue.len());
    for o in queue {
        let _ = write!(out, "\n  {} ({})", o.number, o.order_type.as_str());
        if let Some(minutes) = o.preparation_estimate {
            let _ = write!(out, " ~{} min", minutes);
        }
    }
    out
}

pub fn report(report: &SalesReport, config: &ConfigState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} orders", config.store_name, report.order_count);
    for entry in &report.by_method {
        let _ = writeln!(
            out,
            "  {:<9} {:>3} {:>14}",
            entry.method.as_str(),
            entry.order_count,
            config.format_currency(entry.total)
        );
    }
    let _ = writeln!(out, "IVA {:>27}", config.format_currency(report.tax_total));
    let _ = write!(out, "Gross {:>25}", config.format_currency(report.gross_total));
    out
}

pub fn staff(members: &[StaffMember]) -> String {
    let mut out = String::new();
    for m in members {
        let _ = writeln!(out, "{:<16} {:<26} {}", m.name, m.email, m.role.as_str());
    }
    out.trim_end().to_string()
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
