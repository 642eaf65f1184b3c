use std::{path::Path, process::ExitCode, sync::Arc};

use clap::Parser;
use time::OffsetDateTime;

use spendwise::{
    ApiClient, Command, Config, Credential, Error, ExpenseApi, LocalTimezone, MonthCursor,
    MonthView, NewRecord, Period, SummarySource, daily_spend_chart, format_currency,
    format_date_time, render_categories, render_month_report, setup_logging, validate_amount,
    validate_category_name, validate_emoji,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(error) = setup_logging(config.log_file.as_deref()) {
        eprintln!("Could not open the log file: {error}");
        return ExitCode::FAILURE;
    }

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> Result<(), Error> {
    let timezone = config.local_timezone()?;
    let client = ApiClient::new(&config.api_config())?;

    match &config.command {
        Command::Report {
            year,
            month,
            top,
            chart,
        } => {
            let cursor = match month {
                Some(month) => {
                    let year = year.unwrap_or_else(|| timezone.now().year());
                    MonthCursor::new(Period::from_numbers(year, *month)?)
                }
                None => MonthCursor::current(&timezone),
            };

            report(
                client,
                config.credential()?,
                timezone,
                config.summary_source,
                cursor,
                *top,
                chart.as_deref(),
            )
            .await
        }
        Command::Categories => {
            let categories = client.fetch_categories(&config.credential()?).await?;
            println!("{}", render_categories(&categories));

            Ok(())
        }
        Command::Add {
            amount,
            category,
            at,
        } => {
            let credential = config.credential()?;
            let amount = validate_amount(amount)?;
            let category = validate_category_name(category)?;
            let recorded_at = match at {
                Some(text) => timezone.parse_local(text)?,
                None => OffsetDateTime::now_utc(),
            };

            client
                .submit_record(&credential, &NewRecord::new(amount, &category, recorded_at))
                .await?;
            println!(
                "Recorded {} on {category} at {}",
                format_currency(amount),
                format_date_time(timezone.to_local(recorded_at))
            );

            Ok(())
        }
        Command::AddAudio { path } => {
            let credential = config.credential()?;
            let audio = tokio::fs::read(path)
                .await
                .map_err(|error| Error::AudioFile(format!("{}: {error}", path.display())))?;

            client.submit_audio_record(&credential, &audio).await?;
            println!("Uploaded {}", path.display());

            Ok(())
        }
        Command::AddCategory { name, emoji } => {
            let credential = config.credential()?;
            let name = validate_category_name(name)?;
            let emoji = validate_emoji(emoji)?;

            client.submit_category(&credential, &name, &emoji).await?;
            println!("Created category {emoji} {name}");

            Ok(())
        }
        Command::LogIn { username } => {
            let password = rpassword::prompt_password("Password: ")?;
            let credential = client.log_in(username, &password).await?;

            println!("Logged in as {username}. To use this login, run:");
            println!("export SPENDWISE_TOKEN={}", credential.token());

            Ok(())
        }
        Command::SignUp { username } => {
            let password = rpassword::prompt_password("Password: ")?;
            let confirmation = rpassword::prompt_password("Confirm password: ")?;

            if password != confirmation {
                return Err(Error::PasswordMismatch);
            }

            client.sign_up(username, &password).await?;
            println!("Registered {username}, you can now log in.");

            Ok(())
        }
    }
}

/// Fetch one month through the month view and print it.
async fn report(
    client: ApiClient,
    credential: Credential,
    timezone: LocalTimezone,
    source: SummarySource,
    cursor: MonthCursor,
    top: Option<usize>,
    chart: Option<&Path>,
) -> Result<(), Error> {
    let (view, mut events) = MonthView::new(Arc::new(client), credential, timezone, source, cursor);
    let mut view = match top {
        Some(n) => view.with_top_categories(n),
        None => view,
    };

    view.refresh();

    while let Some(event) = events.recv().await {
        let Some(snapshot) = view.apply(event)? else {
            continue;
        };

        println!("{}", render_month_report(snapshot, &timezone));

        if let Some(path) = chart {
            tokio::fs::write(path, daily_spend_chart(&snapshot.series).to_string()).await?;
            tracing::info!("Wrote the daily spending chart to {}", path.display());
        }

        break;
    }

    Ok(())
}
