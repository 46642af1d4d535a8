//! To-do demo binary
//!
//! Runs a short session against the store and prints the visible list, the
//! action log and the final state as JSON.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use todo::{
    active_count, completed_count, new_store, select_visible_todos, visible_todos_by_name,
    AppState, TodoAction, TodoId, VisibilityFilter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=debug,tidy_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tidy_runtime::metrics::describe_metrics();

    println!("=== Todo: reducer-driven to-do list ===\n");

    let store = new_store();
    let mut actions = store.subscribe_actions();

    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    let subscription = store.subscribe(move |state: &AppState| {
        counter.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            todos = state.todos.len(),
            filter = %state.visibility_filter,
            "State changed"
        );
    });

    let session = [
        TodoAction::AddTodo {
            text: "buy milk".to_string(),
        },
        TodoAction::AddTodo {
            text: "walk dog".to_string(),
        },
        TodoAction::ToggleTodo { id: TodoId::FIRST },
        TodoAction::SetVisibilityFilter {
            filter: VisibilityFilter::Active,
        },
    ];

    for action in session {
        println!(">>> Sending: {}", action.action_type());
        store.send(action).await?;
    }

    let state = store.snapshot().await;

    println!("\nVisible todos ({}):", state.visibility_filter.label());
    for todo in select_visible_todos(&state) {
        let status = if todo.completed { "x" } else { " " };
        println!("  [{status}] {} {}", todo.id, todo.text);
    }
    println!(
        "\nActive: {}  Completed: {}",
        active_count(&state.todos),
        completed_count(&state.todos)
    );

    println!("\nAction log:");
    while let Ok(action) = actions.try_recv() {
        println!("  {}", serde_json::to_string(&action)?);
    }

    store.unsubscribe(subscription.id());
    println!(
        "\nListener notifications: {}",
        notifications.load(Ordering::Relaxed)
    );

    println!("\nFinal state:");
    println!("{}", serde_json::to_string_pretty(&state)?);

    // Raw filter names are checked where they enter the domain
    match visible_todos_by_name(&state.todos, "SHOW_ARCHIVED") {
        Ok(visible) => println!("\nUnexpectedly matched {} todos", visible.len()),
        Err(error) => println!("\nRejected filter: {error}"),
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
