use std::fs;
use std::path::Path;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use onboard_core::config::ConfigManager;
use onboard_core::confirm::{SubmissionConfirmer, SubmissionOutcome};
use onboard_core::errors::FlowError;
use onboard_core::flow::{
    Draft, FieldKind, FieldValue, FlowController, NavigationOutcome, StepDescriptor,
};
use onboard_core::flows;
use onboard_core::gateway::{group_by_section, GatewayClient};
use onboard_core::storage::{BlobStore, DraftStore, JsonDraftStore};

fn main() {
    onboard_core::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), FlowError> {
    let theme = ColorfulTheme::default();
    let config = ConfigManager::new()?.load()?;
    let store = JsonDraftStore::new_default()?;
    let blobs = BlobStore::new(store.base_dir())?;
    let gateway = GatewayClient::new(&config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let all_flows = flows::all();
    let labels: Vec<&str> = all_flows.iter().map(|flow| flow.name).collect();
    let selection = Select::with_theme(&theme)
        .with_prompt("Select a flow")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let flow = &all_flows[selection];

    let mut controller = FlowController::resume(flow, &store)?;
    if !controller.draft().is_empty() {
        println!(
            "Resuming `{}` at step {} of {}.",
            flow.name,
            controller.cursor(),
            flow.terminal_index()
        );
    }

    let confirmer = SubmissionConfirmer::new(flow, &gateway, &blobs);

    loop {
        if controller.at_terminal() {
            match confirmation_round(&theme, &mut controller, &confirmer, &runtime)? {
                Round::Continue => continue,
                Round::Done => return Ok(()),
            }
        } else {
            match step_round(&theme, &mut controller, &blobs)? {
                Round::Continue => continue,
                Round::Done => return Ok(()),
            }
        }
    }
}

enum Round {
    Continue,
    Done,
}

fn step_round<S: DraftStore>(
    theme: &ColorfulTheme,
    controller: &mut FlowController<'_, S>,
    blobs: &BlobStore,
) -> Result<Round, FlowError> {
    let step = controller.current_step().clone();
    println!();
    println!(
        "Step {} of {}: {}",
        step.index,
        controller.flow().terminal_index(),
        step.title
    );

    let mut actions = vec!["Fill in this step", "Back"];
    if step.skippable {
        actions.push("Skip step");
    }
    actions.push("Cancel");
    let choice = Select::with_theme(theme)
        .with_prompt("Action")
        .items(&actions)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match actions[choice] {
        "Back" => {
            controller.previous()?;
            return Ok(Round::Continue);
        }
        "Skip step" => {
            controller.skip()?;
            return Ok(Round::Continue);
        }
        "Cancel" => return cancel(theme, controller),
        _ => {}
    }

    let input = collect_step_input(theme, &step, controller.draft(), blobs)?;
    match controller.next(&input)? {
        NavigationOutcome::Advanced { .. } => {}
        NavigationOutcome::Blocked(violations) => {
            println!("Please fix the following before continuing:");
            for violation in &violations {
                println!("  - {}", violation);
            }
        }
        NavigationOutcome::AtTerminal => {}
    }
    Ok(Round::Continue)
}

fn collect_step_input(
    theme: &ColorfulTheme,
    step: &StepDescriptor,
    draft: &Draft,
    blobs: &BlobStore,
) -> Result<Draft, FlowError> {
    let mut input = Draft::new();
    for field in &step.fields {
        let current = draft.get(field.key).map(FieldValue::display);
        if let Some(help) = field.help {
            println!("  {}", help);
        }
        let prompt = match (field.required, &current) {
            (true, None) => field.label.to_string(),
            (_, Some(existing)) => format!("{} [{}]", field.label, existing),
            (false, None) => format!("{} (optional)", field.label),
        };
        match &field.kind {
            FieldKind::Choice(options) => {
                let mut items: Vec<&str> = options.clone();
                if !field.required {
                    items.push("(none)");
                }
                let picked = Select::with_theme(theme)
                    .with_prompt(prompt)
                    .items(&items)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;
                if picked < options.len() {
                    input.insert(field.key, FieldValue::Choice(options[picked].to_string()));
                }
            }
            FieldKind::Attachment { .. } => {
                if current.is_some()
                    && !Confirm::with_theme(theme)
                        .with_prompt(format!("Replace {}?", field.label))
                        .default(false)
                        .interact()
                        .map_err(prompt_err)?
                {
                    continue;
                }
                let path: String = Input::with_theme(theme)
                    .with_prompt(format!("{} (file path)", prompt))
                    .allow_empty(!field.required)
                    .interact_text()
                    .map_err(prompt_err)?;
                if path.trim().is_empty() {
                    continue;
                }
                let bytes = fs::read(path.trim())?;
                let file_name = Path::new(path.trim())
                    .file_name()
                    .and_then(|name| name.to_str())
                    .unwrap_or("attachment")
                    .to_string();
                let content_type = content_type_for(&file_name);
                let reference = blobs.put(file_name, content_type, &bytes)?;
                input.insert(field.key, FieldValue::Attachment(reference));
            }
            _ => {
                let raw: String = Input::with_theme(theme)
                    .with_prompt(prompt)
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_err)?;
                if !raw.trim().is_empty() {
                    input.insert(field.key, FieldValue::Text(raw));
                }
            }
        }
    }
    Ok(input)
}

fn confirmation_round<S: DraftStore>(
    theme: &ColorfulTheme,
    controller: &mut FlowController<'_, S>,
    confirmer: &SubmissionConfirmer<'_>,
    runtime: &tokio::runtime::Runtime,
) -> Result<Round, FlowError> {
    println!();
    println!("Review your submission:");
    for section in confirmer.summary(controller.draft()) {
        println!("  {}", section.section);
        for entry in &section.entries {
            println!("    {}: {}", entry.label, entry.value);
        }
    }

    let actions = ["Confirm and submit", "Make changes", "Cancel"];
    let choice = Select::with_theme(theme)
        .with_prompt("Action")
        .items(&actions)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    match choice {
        1 => {
            let step: usize = Input::with_theme(theme)
                .with_prompt("Go to step")
                .default(1)
                .interact_text()
                .map_err(prompt_err)?;
            controller.jump_to(step)?;
            return Ok(Round::Continue);
        }
        2 => return cancel(theme, controller),
        _ => {}
    }

    match runtime.block_on(confirmer.submit(controller.draft()))? {
        SubmissionOutcome::Accepted => {
            println!("Submission accepted.");
            controller.finish()?;
            Ok(Round::Done)
        }
        SubmissionOutcome::AuthRequired => {
            println!("Your session is no longer valid. Please log in again and retry.");
            Ok(Round::Done)
        }
        SubmissionOutcome::Denied => {
            println!("You are not permitted to perform this operation.");
            Ok(Round::Done)
        }
        SubmissionOutcome::Rejected {
            errors,
            resume_step,
        } => {
            println!("The gateway rejected the submission:");
            for (section, entries) in group_by_section(&errors) {
                println!("  {}", section);
                for error in &entries {
                    println!("    {}: {}", error.label, error.message);
                }
            }
            let retry_actions = ["Retry", "Make changes", "Cancel"];
            let picked = Select::with_theme(theme)
                .with_prompt("Action")
                .items(&retry_actions)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            match picked {
                0 => Ok(Round::Continue),
                1 => {
                    controller.jump_to(resume_step.unwrap_or(1))?;
                    Ok(Round::Continue)
                }
                _ => cancel(theme, controller),
            }
        }
    }
}

fn cancel<S: DraftStore>(
    theme: &ColorfulTheme,
    controller: &mut FlowController<'_, S>,
) -> Result<Round, FlowError> {
    let confirmed = Confirm::with_theme(theme)
        .with_prompt("Discard this draft?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if confirmed {
        controller.cancel()?;
        println!("Draft discarded.");
        Ok(Round::Done)
    } else {
        Ok(Round::Continue)
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    match Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn prompt_err(err: dialoguer::Error) -> FlowError {
    match err {
        dialoguer::Error::IO(inner) => FlowError::Io(inner),
    }
}
