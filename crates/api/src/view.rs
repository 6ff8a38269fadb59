//! Plain-text rendering of orders.

use domain::Order;

/// Renders one order with its items and total.
///
/// ```text
/// Order 1 - Customer: Alice - Date: 2025-10-01
///   Product: Widget, Quantity: 2, Unit price: $9.99
///   Total: $19.98
/// ```
pub fn render_order(order: &Order) -> String {
    let mut lines = Vec::with_capacity(order.item_count() + 2);
    lines.push(format!(
        "Order {} - Customer: {} - Date: {}",
        order.id(),
        order.customer(),
        order.order_date()
    ));
    for item in order.items() {
        lines.push(format!(
            "  Product: {}, Quantity: {}, Unit price: {}",
            item.product(),
            item.quantity(),
            item.unit_price()
        ));
    }
    lines.push(format!("  Total: {}", order.total()));
    lines.join("\n")
}

/// Renders orders separated by blank lines.
pub fn render_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return render_message("No orders found.");
    }
    orders
        .iter()
        .map(render_order)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_message(message: &str) -> String {
    message.trim().to_string()
}

pub fn render_error(message: &str) -> String {
    format!("Error: {}", message.trim())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use common::{LineItemId, Money, OrderId};
    use domain::LineItem;

    use super::*;

    fn alice() -> Order {
        let id = OrderId::new(1);
        Order::restore(
            id,
            "Alice",
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            vec![
                LineItem::restore(LineItemId::new(1), id, "Widget", 2, Money::from_cents(999)),
                LineItem::restore(LineItemId::new(2), id, "Gadget", 1, Money::from_cents(1999)),
            ],
        )
    }

    #[test]
    fn renders_single_order() {
        assert_eq!(
            render_order(&alice()),
            "Order 1 - Customer: Alice - Date: 2025-10-01\n\
             \x20 Product: Widget, Quantity: 2, Unit price: $9.99\n\
             \x20 Product: Gadget, Quantity: 1, Unit price: $19.99\n\
             \x20 Total: $39.97"
        );
    }

    #[test]
    fn renders_orders_with_blank_line_between() {
        let mut bob = alice();
        bob.rename_customer("Bob").unwrap();

        let text = render_orders(&[alice(), bob]);

        assert_eq!(text.matches("Order 1 - ").count(), 2);
        assert!(text.contains("$39.97\n\nOrder 1 - Customer: Bob"));
    }

    #[test]
    fn renders_empty_list_as_message() {
        assert_eq!(render_orders(&[]), "No orders found.");
    }

    #[test]
    fn renders_error() {
        assert_eq!(render_error("Order 7 not found"), "Error: Order 7 not found");
    }
}
