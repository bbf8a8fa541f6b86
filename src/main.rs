use clap::Parser;
use model_facade::utils::{
    logger::{self, LogFormat},
    validation::Validate,
};
use model_facade::{
    Callbacks, CliArgs, Command, Connection, Dispatch, FacadeError, Interaction, ModelFacade,
    ScriptedInteraction, TerminalInteraction,
};
use std::sync::{Arc, Mutex, PoisonError};

type Slot<T> = Arc<Mutex<Option<std::result::Result<T, FacadeError>>>>;

/// Continuations that park the outcome for printing once the call returns.
fn capture<T: Send + 'static>() -> (Callbacks<T>, Slot<T>) {
    let slot: Slot<T> = Arc::new(Mutex::new(None));
    let on_ok = Arc::clone(&slot);
    let on_err = Arc::clone(&slot);
    let callbacks = Callbacks::on_success(move |value| {
        *on_ok.lock().unwrap_or_else(PoisonError::into_inner) = Some(Ok(value));
    })
    .with_error(move |e| {
        *on_err.lock().unwrap_or_else(PoisonError::into_inner) = Some(Err(e));
    });
    (callbacks, slot)
}

fn take<T>(slot: &Slot<T>) -> Option<std::result::Result<T, FacadeError>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

fn print_json(slot: &Slot<serde_json::Value>) -> anyhow::Result<()> {
    match take(slot) {
        Some(Ok(value)) => println!("{}", serde_json::to_string_pretty(&value)?),
        Some(Err(e)) => return Err(e.into()),
        None => {}
    }
    Ok(())
}

fn print_text(slot: &Slot<String>) -> anyhow::Result<()> {
    match take(slot) {
        Some(Ok(text)) => println!("{}", text),
        Some(Err(e)) => return Err(e.into()),
        None => {}
    }
    Ok(())
}

async fn run(facade: &ModelFacade, command: Command) -> anyhow::Result<Dispatch> {
    let dispatch = match command {
        Command::Types => {
            let (cb, slot) = capture();
            let d = facade.get_types(cb).await;
            print_json(&slot)?;
            d
        }
        Command::Structure { pathname } => {
            let (cb, slot) = capture();
            let d = facade.get_structure(pathname.as_deref(), cb).await;
            print_json(&slot)?;
            d
        }
        Command::Workflow { pathname } => {
            let (cb, slot) = capture();
            let d = facade.get_workflow(&pathname, cb).await;
            print_json(&slot)?;
            d
        }
        Command::Components => {
            let (cb, slot) = capture();
            let d = facade.get_components(cb).await;
            print_json(&slot)?;
            d
        }
        Command::Component { name } => {
            let (cb, slot) = capture();
            let d = facade.get_component(&name, cb).await;
            print_json(&slot)?;
            d
        }
        Command::Connections {
            pathname,
            src_name,
            dst_name,
        } => {
            let (cb, slot) = capture();
            let d = facade
                .get_connections(&pathname, &src_name, &dst_name, cb)
                .await;
            print_json(&slot)?;
            d
        }
        Command::Connect {
            pathname,
            src_name,
            dst_name,
            pairs,
        } => {
            let connections: Vec<Connection> = pairs
                .into_iter()
                .map(|(source, destination)| Connection::new(source, destination))
                .collect();
            let (cb, slot) = capture();
            let d = facade
                .set_connections(&pathname, &src_name, &dst_name, &connections, cb)
                .await;
            print_json(&slot)?;
            d
        }
        Command::Add {
            typepath,
            name,
            parent,
        } => {
            let (cb, slot) = capture();
            let d = facade
                .add_component(&typepath, &name, parent.as_deref(), cb)
                .await;
            print_text(&slot)?;
            d
        }
        Command::NewModel => {
            let (cb, slot) = capture();
            let d = facade.new_model(cb).await;
            print_text(&slot)?;
            d
        }
        Command::Save => {
            let (cb, slot) = capture();
            let d = facade.save_project(cb).await;
            print_text(&slot)?;
            d
        }
        Command::Files => {
            let (cb, slot) = capture();
            let d = facade.get_files(cb).await;
            print_json(&slot)?;
            d
        }
        Command::Cat { path } => {
            let (cb, slot) = capture();
            let d = facade.get_file(&path, cb).await;
            print_text(&slot)?;
            d
        }
        Command::Write { path, contents } => {
            let (cb, slot) = capture();
            let d = facade.set_file(&path, &contents, cb).await;
            print_text(&slot)?;
            d
        }
        Command::Mkdir { path } => {
            let (cb, slot) = capture();
            let d = facade.create_folder(&path, cb).await;
            print_text(&slot)?;
            d
        }
        Command::Rm { path } => facade.remove_file(&path).await,
        Command::NewFile { folder, .. } => facade.new_file(folder.as_deref()).await,
        Command::NewFolder { folder, .. } => facade.new_folder(folder.as_deref()).await,
        Command::Import { path } => {
            let (cb, slot) = capture();
            let d = facade.import_file(&path, cb).await;
            print_text(&slot)?;
            d
        }
        Command::Command { command } => {
            let (cb, slot) = capture();
            let d = facade.issue_command(&command, cb).await;
            print_text(&slot)?;
            d
        }
        Command::Output => {
            let (cb, slot) = capture();
            let d = facade.get_output(cb).await;
            print_text(&slot)?;
            d
        }
        Command::Run => facade.run_model().await,
        Command::Exec { path } => facade.exec_file(&path).await,
        Command::Upload => {
            facade.upload_file();
            Dispatch::HandledLocally
        }
        Command::Exit => match facade.exit() {
            Some(handle) => {
                handle.await?;
                Dispatch::Completed
            }
            None => Dispatch::Skipped,
        },
    };
    Ok(dispatch)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(args.verbose, format);

    let config = args.resolve_config()?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    if args.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // A name given on the command line answers the prompt.
    let preset_name = match &args.command {
        Command::NewFile { name, .. } | Command::NewFolder { name, .. } => name.clone(),
        _ => None,
    };
    let interaction: Arc<dyn Interaction> = match preset_name {
        Some(name) => Arc::new(ScriptedInteraction::with_answers([name])),
        None => Arc::new(TerminalInteraction),
    };

    let facade = ModelFacade::new(&config, interaction)?;
    facade.on_change(|| {
        tracing::info!("🔄 Model changed");
        Ok(())
    });

    match run(&facade, args.command).await {
        Ok(Dispatch::Failed) => {
            eprintln!("❌ Request failed");
            std::process::exit(2);
        }
        Ok(dispatch) if !dispatch.was_sent() => {
            tracing::debug!("No request sent: {:?}", dispatch);
            if dispatch == Dispatch::Skipped {
                eprintln!("Nothing to do");
            }
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}
