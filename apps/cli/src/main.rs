use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    submit_login, BreedFilter, ClientError, Dashboard, DashboardAction, DogApi, LoginError,
    LoginForm, MatchError, MatchFlow, Pagination, ScreenState, SearchFormState, SelectedDogs,
    ShelterClient,
};
use shared::domain::{Dog, DogId, SortDirection};
use tracing_subscriber::EnvFilter;
use url::Url;

mod config;

const SELECTED_DOGS_PAGE: &str = "http://localhost:3000/selected-dogs";
const REAUTH_HINT: &str = "the service rejected the session; log in again with --name and --email";

#[derive(Parser, Debug)]
#[command(name = "finddog", about = "Browse shelter dogs, pick favorites and get matched")]
struct Args {
    /// Config file; `finddog.toml` in the working directory is read when present.
    #[arg(long, global = true, env = "FINDDOG_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    name: Option<String>,
    #[arg(long, global = true)]
    email: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List breed names, optionally narrowed by a case-insensitive substring.
    Breeds {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print one page of search results.
    Search {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long = "breed")]
        breeds: Vec<String>,
        #[arg(long, default_value = "asc")]
        sort: SortDirection,
    },
    /// Walk result pages through the dashboard, selecting dogs by id along the way.
    Browse {
        #[arg(long = "breed")]
        breeds: Vec<String>,
        #[arg(long, default_value = "asc")]
        sort: SortDirection,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long = "select")]
        select: Vec<String>,
        /// Confirm a match for the selected dogs after browsing.
        #[arg(long = "match")]
        confirm_match: bool,
        #[arg(long)]
        logout: bool,
    },
    /// Ask the service to match one of the given dogs.
    Match {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the match-screen link carrying the given dogs.
    Link {
        #[arg(long, default_value = SELECTED_DOGS_PAGE)]
        base: String,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(v) = args.base_url {
        settings.base_url = v;
    }
    if let Some(v) = args.name {
        settings.name = Some(v);
    }
    if let Some(v) = args.email {
        settings.email = Some(v);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::info!(base_url = %settings.base_url, "starting finddog");

    let client = Arc::new(
        ShelterClient::new(settings.base_url.clone()).context("failed to build shelter client")?,
    );
    let form = LoginForm::new(
        settings.name.unwrap_or_default(),
        settings.email.unwrap_or_default(),
    );
    login(client.as_ref(), &form).await?;

    let outcome = match args.command {
        Command::Breeds { filter } => breeds(client.as_ref(), filter.as_deref()).await,
        Command::Search { page, breeds, sort } => search(client.as_ref(), page, breeds, sort).await,
        Command::Browse {
            breeds,
            sort,
            pages,
            select,
            confirm_match,
            logout,
        } => browse(client, breeds, sort, pages, select, confirm_match, logout).await,
        Command::Match { ids } => match_ids(client, ids).await,
        Command::Link { base, ids } => link(client.as_ref(), &base, ids).await,
    };
    if let Some(hint) = outcome.as_ref().err().and_then(reauth_hint) {
        eprintln!("{hint}");
    }
    outcome
}

fn reauth_hint(err: &anyhow::Error) -> Option<&'static str> {
    let client_err = err
        .downcast_ref::<ClientError>()
        .or_else(|| match err.downcast_ref::<MatchError>() {
            Some(MatchError::Client(inner)) => Some(inner),
            _ => None,
        });
    client_err
        .filter(|e| e.requires_reauth())
        .map(|_| REAUTH_HINT)
}

async fn login(api: &dyn DogApi, form: &LoginForm) -> Result<()> {
    match submit_login(api, form).await {
        Ok(()) => Ok(()),
        Err(LoginError::Invalid(errors)) => {
            for err in &errors {
                eprintln!("{:?}: {err}", err.field());
            }
            bail!("login form is invalid; pass --name and --email")
        }
        Err(LoginError::Failed(message)) => Err(anyhow!(message)),
    }
}

async fn breeds(api: &dyn DogApi, filter: Option<&str>) -> Result<()> {
    let breeds = BreedFilter::new(api.breeds().await?);
    for breed in breeds.matching(filter.unwrap_or_default()) {
        println!("{breed}");
    }
    Ok(())
}

async fn search(api: &dyn DogApi, page: u32, breeds: Vec<String>, sort: SortDirection) -> Result<()> {
    let form = breeds
        .iter()
        .fold(SearchFormState::default(), |form, breed| form.toggle_breed(breed))
        .with_sort(sort)
        .with_offset(Pagination::offset_for(page.max(1)));

    let page_result = api.search(&form.query()).await?;
    let dogs = if page_result.result_ids.is_empty() {
        Vec::new()
    } else {
        api.fetch_by_ids(&page_result.result_ids).await?
    };

    render_screen(
        &ScreenState::Success {
            dogs,
            available_breeds: Vec::new(),
        },
        &SelectedDogs::new(),
    );
    println!(
        "Page {} of {}",
        page.max(1),
        Pagination::pages_for(page_result.total)
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn browse(
    api: Arc<ShelterClient>,
    breeds: Vec<String>,
    sort: SortDirection,
    pages: u32,
    select: Vec<String>,
    confirm_match: bool,
    logout: bool,
) -> Result<()> {
    let dashboard = Dashboard::new(api.clone());
    dashboard.mount().await;
    for breed in breeds {
        dashboard.apply(DashboardAction::ToggleBreed(breed)).await;
    }
    dashboard.apply(DashboardAction::SetSort(sort)).await;

    let wanted: Vec<DogId> = select.into_iter().map(DogId::new).collect();
    for page in 1..=pages.max(1) {
        if page > 1 && !dashboard.apply(DashboardAction::NextPage).await {
            break;
        }
        let screen = dashboard.screen();
        if let Some(dogs) = screen.dogs() {
            for dog in dogs.iter().filter(|d| wanted.contains(&d.id)) {
                if !dashboard.is_selected(&dog.id).await {
                    dashboard
                        .apply(DashboardAction::ToggleDog(dog.clone()))
                        .await;
                }
            }
        }
        render_screen(&dashboard.screen(), &dashboard.selection().await);
        let pagination = dashboard.pagination().await;
        println!(
            "Page {} of {}",
            pagination.current(),
            pagination.total_pages()
        );
    }

    let selection = dashboard.selection().await;
    if !selection.is_empty() {
        let base = Url::parse(SELECTED_DOGS_PAGE)?;
        println!("Selected {} dog(s): {}", selection.len(), dashboard.selection_link(&base).await?);
    }
    if confirm_match {
        run_match(api.clone(), selection).await?;
    }
    if logout {
        dashboard.logout().await?;
        println!("Logged out");
    }
    Ok(())
}

async fn match_ids(api: Arc<ShelterClient>, ids: Vec<String>) -> Result<()> {
    let selection = hydrate_selection(api.as_ref(), ids).await?;
    run_match(api, selection).await
}

async fn run_match(api: Arc<ShelterClient>, selection: SelectedDogs) -> Result<()> {
    let mut flow = MatchFlow::new(api, selection);
    let matched = flow.confirm().await?;
    println!("You Matched!");
    print_dog(matched, true);
    flow.close();
    Ok(())
}

async fn link(api: &dyn DogApi, base: &str, ids: Vec<String>) -> Result<()> {
    let base = Url::parse(base).with_context(|| format!("invalid link base '{base}'"))?;
    let selection = hydrate_selection(api, ids).await?;
    println!("{}", selection.navigation_url(&base)?);
    Ok(())
}

async fn hydrate_selection(api: &dyn DogApi, ids: Vec<String>) -> Result<SelectedDogs> {
    let ids: Vec<DogId> = ids.into_iter().map(DogId::new).collect();
    let dogs = api.fetch_by_ids(&ids).await?;
    if dogs.is_empty() {
        bail!("none of the given ids matched a dog");
    }
    Ok(dogs.into_iter().collect())
}

fn render_screen(screen: &ScreenState, selection: &SelectedDogs) {
    match screen {
        ScreenState::Loading => println!("Loading..."),
        ScreenState::Error { message } => println!("Error: {message}"),
        ScreenState::Success { dogs, .. } if dogs.is_empty() => println!("No dogs found."),
        ScreenState::Success { dogs, .. } => {
            for dog in dogs {
                print_dog(dog, selection.contains(&dog.id));
            }
        }
    }
}

fn print_dog(dog: &Dog, selected: bool) {
    let mark = if selected { "x" } else { " " };
    println!(
        "[{mark}] {:<20} {:<28} {:>2} years  {}  {}",
        dog.name, dog.breed, dog.age, dog.zip_code, dog.id
    );
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
