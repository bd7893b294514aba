//! Login Workflow
//!
//! This example walks a small application through login, a failed attempt,
//! a password reset detour and a successful login.
//!
//! Key concepts:
//! - States attached to a root workflow
//! - Generic and scoped enter/leave listeners
//! - Actions that only exist while their state is active
//!
//! Run with: RUST_LOG=statewise=debug cargo run --example login_workflow

use statewise::core::event;
use statewise::{args, StateNode, WorkflowError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), WorkflowError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Login Workflow Example ===\n");

    let app = StateNode::new("app");
    let login = StateNode::new("login");
    let forgot_password = StateNode::new("forgot-password");
    let home = StateNode::new("home");
    app.add(&login)?;
    app.add(&forgot_password)?;
    app.add(&home)?;

    app.on(event::ENTER, |e| {
        if let Some(state) = e.node() {
            println!("  + showing {}", state.name());
        }
        Ok(())
    });
    app.on(event::LEAVE, |e| {
        if let Some(state) = e.node() {
            println!("  - hiding {}", state.name());
        }
        Ok(())
    });
    app.on("enter home", |_| {
        println!("  welcome back!");
        Ok(())
    });

    let next = home.clone();
    login.define_action("authenticate", move |workflow, args| {
        let user = args.first().and_then(|v| v.as_str());
        let password = args.get(1).and_then(|v| v.as_str());
        if user == Some("admin") && password == Some("password") {
            workflow.go_to_state(&next)?;
        } else {
            println!("  invalid username or password");
        }
        Ok(())
    });
    login.define_action("forgotPassword", |workflow, _| {
        workflow.go_to_state("forgot-password")?;
        Ok(())
    });
    forgot_password.define_action("back", |workflow, _| {
        workflow.go_to_state("login")?;
        Ok(())
    });

    println!("Opening the application:");
    app.go_to_state(&login)?;

    println!("\nWrong password:");
    let ran = app.trigger("authenticate", args!["admin", "hunter2"])?;
    println!("  action ran: {ran}, active: {:?}", app.active_path());

    println!("\nPassword reset detour:");
    app.trigger("forgotPassword", args![])?;
    let ran = app.trigger("authenticate", args!["admin", "password"])?;
    println!("  authenticate available here: {ran}");
    app.trigger("back", args![])?;

    println!("\nCorrect password:");
    app.trigger("authenticate", args!["admin", "password"])?;

    println!("\nVisited: {:?}", app.history().path());
    println!("\n=== Example Complete ===");
    Ok(())
}
