//! Nested States
//!
//! This example shows a state that is itself a workflow: the login screen
//! has its own `default`, `loading` and `invalid` sub-states, and an
//! asynchronous login request is ignored if the user navigates away first.
//!
//! Key concepts:
//! - Picking a default sub-state when a composite state is entered
//! - Sub-states torn down automatically when the parent state is left
//! - Cancellation by construction: actions resolve against the live state
//!
//! Run with: cargo run --example nested_states

use statewise::core::event;
use statewise::{args, StateNode, WorkflowError};
use std::time::Duration;
use tokio::task::LocalSet;

fn build() -> Result<(StateNode, StateNode), WorkflowError> {
    let app = StateNode::new("app");
    let login = StateNode::new("login");
    app.add(&login)?;
    app.add(&StateNode::new("forgot-password"))?;
    app.add(&StateNode::new("home"))?;
    for name in ["default", "invalid", "loading"] {
        login.add(&StateNode::new(name))?;
    }

    let weak = login.downgrade();
    login.on(event::ENTERING, move |_| {
        if let Some(login) = weak.upgrade() {
            login.go_to_state("default")?;
        }
        Ok(())
    });
    login.on("enter loading", |_| {
        println!("  [login] Thinking...");
        Ok(())
    });
    login.on("enter invalid", |e| {
        if let Some(message) = e.arg(0).and_then(|v| v.as_str()) {
            println!("  [login] {message}");
        }
        Ok(())
    });
    login.on("leave invalid", |_| {
        println!("  [login] message cleared");
        Ok(())
    });

    let weak = login.downgrade();
    login.on("trigger authenticate", move |_| {
        if let Some(login) = weak.upgrade() {
            login.go_to_state("loading")?;
        }
        Ok(())
    });

    login.define_action("authenticate", |workflow, args| {
        let workflow = workflow.clone();
        let ok = args.first().and_then(|v| v.as_str()) == Some("admin")
            && args.get(1).and_then(|v| v.as_str()) == Some("password");
        tokio::task::spawn_local(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let action = if ok { "loginSuccess" } else { "loginError" };
            match workflow.trigger(action, args![]) {
                Ok(true) => {}
                Ok(false) => println!("  (\"{action}\" arrived after leaving login; ignored)"),
                Err(e) => eprintln!("  {action} failed: {e}"),
            }
        });
        Ok(())
    });
    login.define_action("loginSuccess", |workflow, _| {
        workflow.go_to_state("home")?;
        Ok(())
    });
    let weak = login.downgrade();
    login.define_action("loginError", move |_, _| {
        if let Some(login) = weak.upgrade() {
            login.go_to_state_with("invalid", args!["invalid username or password!"])?;
        }
        Ok(())
    });

    Ok((app, login))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), WorkflowError> {
    println!("=== Nested States Example ===\n");

    LocalSet::new()
        .run_until(async {
            let (app, _login) = build()?;

            println!("Entering login:");
            app.go_to_state("login")?;
            println!("  active: {:?}", app.active_path());

            println!("\nBad password:");
            app.trigger("authenticate", args!["admin", "nope"])?;
            tokio::time::sleep(Duration::from_millis(400)).await;
            println!("  active: {:?}", app.active_path());

            println!("\nGood password, but leaving before the reply:");
            app.trigger("authenticate", args!["admin", "password"])?;
            app.go_to_state("forgot-password")?;
            tokio::time::sleep(Duration::from_millis(400)).await;
            println!("  active: {:?}", app.active_path());

            println!("\nGood password:");
            app.go_to_state("login")?;
            app.trigger("authenticate", args!["admin", "password"])?;
            tokio::time::sleep(Duration::from_millis(400)).await;
            println!("  active: {:?}", app.active_path());

            Ok::<(), WorkflowError>(())
        })
        .await?;

    println!("\n=== Example Complete ===");
    Ok(())
}
