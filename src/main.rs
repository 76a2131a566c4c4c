mod cli;

use std::{process, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use thermoguard_client::{
    bands,
    config::Config,
    models::{Reading, ReadingDraft, Sensor, SensorDraft},
    stats::{DashboardStats, PeriodReport},
    ApiError, HttpTransport, ReadingService, SensorService,
};

use crate::cli::{Cli, Command};

const OUTCOME_UNKNOWN_HINT: &str =
    "A operação pode ter sido aplicada pelo servidor; confira antes de repetir.";

#[tokio::main]
async fn main() {
    // Load .env (ignore error if file absent, env vars may be set externally)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tokio::select! {
        result = run(cli.command) => {
            if let Err(e) = result {
                report_failure(&e);
                process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Interrupted; pending request abandoned");
            process::exit(130);
        }
    }
}

fn report_failure(e: &anyhow::Error) {
    eprintln!("{e:#}");
    if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_outcome_unknown) {
        eprintln!("{OUTCOME_UNKNOWN_HINT}");
    }
}

async fn run(command: Command) -> Result<()> {
    let config = Config::from_env()?;

    let transport = Arc::new(HttpTransport::new(&config)?);
    info!(
        api_url = %transport.base_url(),
        timeout_ms = config.timeout.as_millis() as u64,
        "Client ready"
    );

    let sensors = SensorService::new(transport.clone());
    let readings = ReadingService::new(transport);

    match command {
        Command::Sensors => sensors.list().await?.iter().for_each(print_sensor),
        Command::Sensor { id } => print_sensor(&sensors.get_by_id(id).await?),
        Command::AddSensor { nome, localizacao } => {
            let created = sensors.create(&SensorDraft::new(nome, localizacao)).await?;
            print_sensor(&created);
        }
        Command::EditSensor {
            id,
            nome,
            localizacao,
        } => {
            sensors.update(id, &SensorDraft::new(nome, localizacao)).await?;
            println!("Sensor {id} atualizado");
        }
        Command::DeleteSensor { id } => {
            sensors.delete(id).await?;
            println!("Sensor {id} excluído");
        }
        Command::Readings => readings.list().await?.iter().for_each(print_reading),
        Command::Reading { id } => print_reading(&readings.get_by_id(id).await?),
        Command::AddReading { fields } => {
            let created = readings.create(&ReadingDraft::from(fields)).await?;
            print_reading(&created);
        }
        Command::EditReading { id, fields } => {
            readings.update(id, &ReadingDraft::from(fields)).await?;
            println!("Leitura {id} atualizada");
        }
        Command::DeleteReading { id } => {
            readings.delete(id).await?;
            println!("Leitura {id} excluída");
        }
        Command::High => {
            for r in readings.get_high_temperatures().await? {
                println!(
                    "[{}] {}",
                    bands::alert_icon(r.temperatura),
                    reading_line(&r)
                );
            }
        }
        Command::Report { inicio, fim } => {
            let report = PeriodReport::generate(&readings, inicio, fim).await?;
            report.leituras.iter().for_each(print_reading);
            match report.resumo {
                Some(s) => println!(
                    "Total: {}  Mínima: {:.1}°C  Máxima: {:.1}°C  Média: {:.1}°C",
                    s.total, s.minima, s.maxima, s.media
                ),
                None => println!("Nenhuma leitura no período"),
            }
        }
        Command::Dashboard => {
            let stats = DashboardStats::load(&sensors, &readings).await?;
            println!("Sensores: {}", stats.total_sensores);
            println!("Leituras: {}", stats.total_leituras);
            println!("Temperaturas altas: {}", stats.temperaturas_altas);
            println!("Temperatura média: {:.1}°C", stats.temperatura_media);
            if let Some(last) = &stats.ultima_leitura {
                println!("Última leitura: {}", reading_line(last));
            }
        }
    }

    Ok(())
}

fn print_sensor(s: &Sensor) {
    println!("#{} {} ({})", s.id, s.nome, s.localizacao);
}

fn print_reading(r: &Reading) {
    let band = bands::classify_for_list(r.temperatura);
    println!(
        "[{} {}] {}",
        band.icon.unwrap_or_default(),
        band.color,
        reading_line(r)
    );
}

fn reading_line(r: &Reading) -> String {
    let sensor = r
        .nome_sensor
        .clone()
        .unwrap_or_else(|| format!("sensor {}", r.sensor_id));
    format!(
        "#{} {:.1}°C {} {}",
        r.id,
        r.temperatura,
        sensor,
        r.data_hora.format("%d/%m/%Y %H:%M")
    )
}
