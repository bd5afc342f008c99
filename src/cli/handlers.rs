use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::host::StorageBridge;
use crate::io::config_io;
use crate::io::gateway::Gateway;
use crate::io::local::{DirBridge, LocalStore};
use crate::io::state::{self, ViewState};
use crate::model::config::StorageMode;
use crate::model::view::ViewType;
use crate::ops::filter::{filter_tasks, project_task_count, view_title};
use crate::ops::store::DomainStore;
use crate::remind::notify::TerminalNotifier;
use crate::remind::scheduler::ReminderScheduler;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = config_io::read_config();

    if config.storage.mode == StorageMode::Remote {
        // The remote record store and auth host are injected collaborators;
        // the CLI binary only wires the local tier
        return Err("remote mode requires an embedding host; set storage.mode = \"local\"".into());
    }

    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .or_else(|| config.storage.data_dir.clone())
        .unwrap_or_else(config_io::default_data_dir);
    let bridge = config
        .storage
        .bridge_dir
        .as_ref()
        .map(|dir| Arc::new(DirBridge::new(dir)) as Arc<dyn StorageBridge>);
    let gateway = Gateway::new(bridge, LocalStore::new(data_dir));

    match cli.command {
        Commands::Add(args) => cmd_add(args, &gateway, json).await,
        Commands::List(args) => cmd_list(args, &gateway, json).await,
        Commands::View(args) => cmd_view(args, &gateway, json).await,
        Commands::Toggle(args) => cmd_toggle(args, &gateway, json, false).await,
        Commands::Done(args) => cmd_toggle(args, &gateway, json, true).await,
        Commands::Rm(args) => cmd_rm(args, &gateway).await,
        Commands::Project(args) => match args.action {
            ProjectAction::New(args) => cmd_project_new(args, &gateway, json).await,
            ProjectAction::Rm(args) => cmd_project_rm(args, &gateway).await,
        },
        Commands::Projects => cmd_projects(&gateway, json).await,
        Commands::Watch => cmd_watch(&gateway).await,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_store(gateway: &Gateway) -> DomainStore {
    let mut store = DomainStore::local(gateway.clone());
    store.load_all().await;
    store
}

fn parse_due(due: Option<&str>) -> Result<Option<DateTime<Utc>>, Box<dyn std::error::Error>> {
    match due {
        None => Ok(None),
        Some(s) => {
            let parsed = DateTime::parse_from_rfc3339(s)
                .map_err(|e| format!("invalid --due '{}': {} (expected RFC 3339)", s, e))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
    }
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

async fn cmd_add(
    args: AddArgs,
    gateway: &Gateway,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let due = parse_due(args.due.as_deref())?;
    if args.remind.is_some() && due.is_none() {
        return Err("--remind needs --due; a reminder without a due instant never fires".into());
    }

    let ctx = state::read_view_state(gateway).await;
    let mut store = load_store(gateway).await;
    let created = store.create_task(&args.text, due, args.remind, &ctx).await;

    match created {
        Some(task) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("added: {}", format_task_line(&task));
                if task.has_reminder() {
                    println!("(run `gd watch` to keep reminders armed)");
                }
            }
        }
        // Empty text: silently rejected, not an error
        None => {}
    }
    Ok(())
}

async fn cmd_list(
    args: ListArgs,
    gateway: &Gateway,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = state::read_view_state(gateway).await;
    let store = load_store(gateway).await;
    let query = args.search.as_deref().unwrap_or("");
    let visible = filter_tasks(store.tasks(), ctx.view, ctx.selected_project, query);
    let title = view_title(ctx.view, ctx.selected_project, store.projects());

    if json {
        let output = TaskListJson {
            view: ctx.view.to_string(),
            title,
            tasks: &visible,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}:", title);
        if visible.is_empty() {
            println!("(no tasks)");
        }
        for task in &visible {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

async fn cmd_view(
    args: ViewArgs,
    gateway: &Gateway,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let view: ViewType = args.view.parse()?;
    if view == ViewType::Project && args.project.is_none() {
        return Err("the project view needs a project id (see `gd projects`)".into());
    }
    let ctx = ViewState {
        view,
        selected_project: if view == ViewType::Project {
            args.project
        } else {
            None
        },
    };
    state::write_view_state(gateway, &ctx).await;

    let store = load_store(gateway).await;
    let title = view_title(ctx.view, ctx.selected_project, store.projects());
    if json {
        let output = ViewStateJson {
            view: view.to_string(),
            title,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("view: {}", title);
    }
    Ok(())
}

async fn cmd_toggle(
    args: IdArg,
    gateway: &Gateway,
    json: bool,
    done_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(gateway).await;
    if done_only {
        // `gd done` on an already-done task is a no-op, not an un-complete
        match store.tasks().iter().find(|t| t.id == args.id) {
            Some(task) if task.completed => {
                println!("already done");
                return Ok(());
            }
            Some(_) => {}
            None => return Err(format!("task not found: {}", args.id).into()),
        }
    }
    match store.toggle_task(args.id).await {
        Some(task) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{}", format_task_line(&task));
            }
            Ok(())
        }
        None => Err(format!("task not found: {}", args.id).into()),
    }
}

async fn cmd_rm(args: IdArg, gateway: &Gateway) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(gateway).await;
    if store.delete_task(args.id).await {
        println!("deleted task {}", args.id);
        Ok(())
    } else {
        Err(format!("task not found: {}", args.id).into())
    }
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

async fn cmd_project_new(
    args: ProjectNewArgs,
    gateway: &Gateway,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(gateway).await;
    match store.create_project(&args.name).await {
        Some(project) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&project)?);
            } else {
                println!("created project {} ({})", project.name, project.id);
            }
        }
        None => {}
    }
    Ok(())
}

async fn cmd_project_rm(
    args: ProjectIdArg,
    gateway: &Gateway,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = load_store(gateway).await;
    if store.delete_project(args.id).await {
        println!("deleted project {} (its tasks moved to the inbox)", args.id);
        // A deleted project is no longer a valid view context
        let ctx = state::read_view_state(gateway).await;
        if ctx.view == ViewType::Project && ctx.selected_project == Some(args.id) {
            state::write_view_state(gateway, &ViewState::default()).await;
        }
        Ok(())
    } else {
        Err(format!("project not found: {}", args.id).into())
    }
}

async fn cmd_projects(gateway: &Gateway, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(gateway).await;
    if json {
        let infos: Vec<ProjectInfoJson> = store
            .projects()
            .iter()
            .map(|p| ProjectInfoJson {
                id: p.id,
                name: &p.name,
                color: &p.color,
                open_tasks: project_task_count(store.tasks(), p.id),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        if store.projects().is_empty() {
            println!("(no projects)");
        }
        for project in store.projects() {
            let count = project_task_count(store.tasks(), project.id);
            println!("{}", format_project_line(project, count));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reminders
// ---------------------------------------------------------------------------

async fn cmd_watch(gateway: &Gateway) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(gateway).await;
    let mut scheduler = ReminderScheduler::new(Arc::new(TerminalNotifier));
    scheduler.rescan(store.tasks());

    if scheduler.armed_count() == 0 {
        println!("no reminders to watch");
        return Ok(());
    }

    println!(
        "watching {} reminder(s); Ctrl-C to stop (pending reminders are lost)",
        scheduler.armed_count()
    );
    tokio::signal::ctrl_c().await?;
    Ok(())
}
