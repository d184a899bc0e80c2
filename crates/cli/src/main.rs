use clap::{Args, Parser, Subcommand};
use surgery_client::{
    Column, DetailTarget, DetailView, Field, ListView, Route, SurgeryClient, SurgeryForm,
    DEFAULT_API_URL, DEFAULT_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "surgery")]
#[command(about = "Surgery manager CLI")]
struct Cli {
    /// Server origin, e.g. http://localhost:3000
    #[arg(long, env = "SURGERY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server is up
    Health,
    /// List upcoming scheduled surgeries
    List {
        /// Sort column: dateTime, surgeryType, surgeon, patient or status
        #[arg(long)]
        sort: Option<Column>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page (5, 10, 25 or 50)
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Show one surgery
    Show {
        /// Surgery id
        id: String,
    },
    /// Edit a surgery ("new" creates one)
    Edit {
        /// Surgery id, or "new"
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Schedule a new surgery
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Cancel a surgery
    Cancel {
        /// Surgery id
        id: String,
    },
}

#[derive(Args)]
struct FieldArgs {
    /// Scheduled time, local YYYY-MM-DDTHH:MM
    #[arg(long)]
    date_time: Option<String>,
    #[arg(long)]
    surgery_type: Option<String>,
    #[arg(long)]
    surgeon: Option<String>,
    #[arg(long)]
    patient_name: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    patient_birthdate: Option<String>,
    #[arg(long)]
    patient_age: Option<String>,
    /// scheduled, completed or cancelled
    #[arg(long)]
    status: Option<String>,
}

impl FieldArgs {
    fn edits(&self) -> Vec<(Field, &str)> {
        [
            (Field::DateTime, &self.date_time),
            (Field::SurgeryType, &self.surgery_type),
            (Field::Surgeon, &self.surgeon),
            (Field::PatientName, &self.patient_name),
            (Field::PatientBirthdate, &self.patient_birthdate),
            (Field::PatientAge, &self.patient_age),
            (Field::Status, &self.status),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surgery=warn,surgery_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = SurgeryClient::new(&cli.api_url);
    tracing::debug!(api_url = %client.base_url(), "surgery CLI starting");

    match cli.command {
        Some(Commands::Health) => {
            let health = client.health().await?;
            println!("{} at {}", health.status, health.timestamp.to_rfc3339());
        }
        Some(Commands::List {
            sort,
            desc,
            page,
            page_size,
        }) => {
            tracing::debug!(?sort, desc, page, page_size, "listing surgeries");
            let mut view = ListView::new();
            view.set_page_size(page_size)?;
            if let Some(column) = sort {
                view.sort_by(column);
                if desc {
                    view.sort_by(column);
                }
            }
            view.load(&client).await?;
            view.set_page(page.saturating_sub(1));
            print_list(&view);
        }
        Some(Commands::Show { id }) => {
            tracing::debug!(%id, "showing surgery");
            let mut view = DetailView::new(DetailTarget::parse(&id));
            view.load(&client).await?;
            print_form(view.target(), view.form());
        }
        Some(Commands::Edit { id, fields }) => {
            edit(&client, Route::List.view(&id), &fields).await?;
        }
        Some(Commands::Add { fields }) => {
            edit(&client, Route::List.add(), &fields).await?;
        }
        Some(Commands::Cancel { id }) => {
            tracing::debug!(%id, "cancelling surgery");
            let surgery = client.cancel(&id).await?;
            println!("Cancelled surgery {}", surgery.id);
        }
        None => {
            println!("Use 'surgery --help' for commands");
        }
    }

    Ok(())
}

async fn edit(client: &SurgeryClient, route: Route, fields: &FieldArgs) -> anyhow::Result<()> {
    let Some(target) = route.detail_target() else {
        return Ok(());
    };
    tracing::debug!(%target, edits = fields.edits().len(), "editing surgery");
    let mut view = DetailView::new(target.clone());
    view.load(client).await?;

    for (field, value) in fields.edits() {
        view.edit(field, value)?;
    }

    if !view.controls_visible() {
        println!("No changes for surgery {}", view.target());
        return Ok(());
    }

    let created = view.target().is_new();
    match view.save(client).await? {
        Some(surgery) if created => println!("Surgery created! id: {}", surgery.id),
        Some(surgery) => println!("Surgery updated: {}", surgery.id),
        None => {}
    }
    print_form(view.target(), view.form());
    Ok(())
}

fn print_list(view: &ListView) {
    let rows = view.page_rows();
    if rows.is_empty() {
        println!("No upcoming surgeries.");
        return;
    }
    for surgery in rows {
        println!(
            "{}  {}  {}  {}  {}  {}",
            surgery
                .date_time
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            surgery.surgery_type,
            surgery.surgeon,
            surgery.patient.name,
            surgery.status,
            surgery.id
        );
    }
    println!(
        "Page {} of {} ({} surgeries)",
        view.page() + 1,
        view.page_count(),
        view.rows().len()
    );
}

fn print_form(target: &DetailTarget, form: Option<&SurgeryForm>) {
    let Some(form) = form else {
        return;
    };
    println!("ID:                {target}");
    println!("Date/time:         {}", form.date_time);
    println!("Surgery type:      {}", form.surgery_type);
    println!("Surgeon:           {}", form.surgeon);
    println!("Patient name:      {}", form.patient_name);
    println!("Patient birthdate: {}", form.patient_birthdate);
    println!("Patient age:       {}", form.patient_age);
    println!("Status:            {}", form.status);
}
