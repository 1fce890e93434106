//! Login, preferences and order history.

use std::io::Write;

use clap::Subcommand;
use luxe_core::{Action, OrderId, OrderStatus, SessionUser};

use super::Context;
use crate::error::{CliError, Result};
use crate::render;

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first
    List,
    /// Change an order's status (admin only)
    Status { id: String, status: OrderStatus },
}

/// # Errors
///
/// Returns the store's rejection or an I/O error.
pub fn login(ctx: &mut Context, email: String, password: String, out: &mut impl Write) -> Result<()> {
    ctx.dispatch(Action::Login { email, password }, out)
}

/// # Errors
///
/// Returns an error if the state cannot be saved.
pub fn logout(ctx: &mut Context, out: &mut impl Write) -> Result<()> {
    ctx.dispatch(Action::Logout, out)
}

/// # Errors
///
/// Returns `AdminRequired` or `OrderNotFound` for status changes, or an
/// I/O error.
pub fn orders(ctx: &mut Context, command: OrdersCommand, out: &mut impl Write) -> Result<()> {
    match command {
        OrdersCommand::List => {
            render::orders(out, ctx.state().orders.latest_first())?;
            Ok(())
        }
        OrdersCommand::Status { id, status } => {
            let is_admin = ctx.state().user.as_ref().is_some_and(SessionUser::is_admin);
            if !is_admin {
                return Err(CliError::AdminRequired);
            }
            let order_id = OrderId::new(id);
            if ctx.state().orders.find(&order_id).is_none() {
                return Err(CliError::OrderNotFound(order_id.to_string()));
            }
            ctx.dispatch(Action::SetOrderStatus { order_id, status }, out)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{context, reload, text};
    use super::*;

    #[test]
    fn test_login_survives_between_runs() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        login(&mut ctx, "admin@luxe.com".to_string(), "12345".to_string(), &mut out).unwrap();
        assert!(reload(&ctx).user.unwrap().is_admin());
        assert!(text(out).contains("Admin logged in!"));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        let err = login(&mut ctx, "user@test.com".to_string(), "nope".to_string(), &mut out)
            .unwrap_err();
        assert!(matches!(err, CliError::Rejected(_)));
        assert!(reload(&ctx).user.is_none());
    }

    #[test]
    fn test_status_change_requires_admin() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        let command = OrdersCommand::Status {
            id: "123456".to_string(),
            status: OrderStatus::Shipped,
        };
        assert!(matches!(orders(&mut ctx, command, &mut out), Err(CliError::AdminRequired)));

        login(&mut ctx, "admin@luxe.com".to_string(), "12345".to_string(), &mut out).unwrap();
        let command = OrdersCommand::Status {
            id: "123456".to_string(),
            status: OrderStatus::Shipped,
        };
        assert!(matches!(
            orders(&mut ctx, command, &mut out),
            Err(CliError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_empty_history() {
        let (_dir, mut ctx) = context();
        let mut out = Vec::new();
        orders(&mut ctx, OrdersCommand::List, &mut out).unwrap();
        assert_eq!(text(out), "No orders yet.\n");
    }
}
