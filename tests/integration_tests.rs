use anyhow::Result;
use moto2sprit::core::writer::{COSTS_FILE, FUELINGS_FILE};
use moto2sprit::{
    feed_lines, ConversionPipeline, ConverterConfig, EtlEngine, EtlError, LocalStorage,
};
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const HEADER: &str = concat!(
    "cost_id;fueling_id;cost_type;date;fuel_id;gas_station_id;odometer;trip_odometer;",
    "quantity;cost;notes;fueling_type;tires;driving_style;route_motorway;route_country;",
    "route_city;bc_consumption;bc_avg_speed;ac;currency;fuel_name;gas_station_name\n",
);

/// Runs the whole conversion over `input` and returns the output directory.
async fn convert(input: &str, miles: bool) -> Result<TempDir> {
    let temp_dir = TempDir::new()?;
    let config = ConverterConfig {
        miles,
        output_dir: temp_dir.path().to_path_buf(),
        poll_interval: Duration::from_millis(10),
        ..ConverterConfig::default()
    };

    let stop = CancellationToken::new();
    let storage = LocalStorage::new(temp_dir.path());
    let (pipeline, tx) = ConversionPipeline::new(storage, config, stop.clone());
    let engine = EtlEngine::new(pipeline);
    let worker = tokio::spawn(async move { engine.run().await });

    feed_lines(input.as_bytes(), tx, CancellationToken::new()).await?;
    stop.cancel();
    worker.await??;

    Ok(temp_dir)
}

fn read_lines(dir: &TempDir, name: &str) -> Vec<String> {
    std::fs::read_to_string(dir.path().join(name))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[tokio::test]
async fn test_end_to_end_costs_and_fuelings() -> Result<()> {
    let input = format!(
        "{}{}{}{}",
        HEADER,
        "1;;toll;2021-03-05;;;150000;;;12.50;A4 motorway;;;;;;;;;;EUR;;\n",
        concat!(
            ";7;;2021-03-06;3;11;150320;320.5;20.1;120.60;;full;summer;normal;",
            "10;60;30;6.2;55;0;PLN;\"LPG\";Orlen\n",
        ),
        concat!(
            ";8;;2021-03-01;3;11;150000;0;40;250;;full;summer;economical;",
            "0;0;0;;;;PLN;\"Eurosuper 95\";BP\n",
        ),
    );
    let dir = convert(&input, false).await?;

    let costs = read_lines(&dir, COSTS_FILE);
    assert_eq!(costs[0], "Date;Odometer;Cost type;Note;Total price;Currency");
    assert_eq!(costs[1], "05.03.2021;150000,00;19;A4 motorway;12,50;\"EUR\"");
    assert_eq!(costs.len(), 2);

    let fuelings = read_lines(&dir, FUELINGS_FILE);
    assert_eq!(fuelings.len(), 3);
    assert!(fuelings[0].starts_with("Date;Odometer;Trip;Quantity;Total price;Currency;Type"));
    // most recent first
    assert_eq!(
        fuelings[1],
        concat!(
            "06.03.2021;150320;320,5;20,1;120,60;\"PLN\";1;1;14;2;12;\"\";",
            "6,27;6,2;;55;\"Orlen\";PL;\"\";\"\"",
        )
    );
    assert!(fuelings[2].starts_with("01.03.2021;150000;0;40;250;\"PLN\";3;1;0;1;6;"));
    Ok(())
}

#[tokio::test]
async fn test_only_costs_writes_one_file() -> Result<()> {
    let input = format!("{}{}", HEADER, "4;;insurance;2022-02-02;;;0;;;900;;;;;;;;;;;EUR;;\n");
    let dir = convert(&input, false).await?;

    assert!(dir.path().join(COSTS_FILE).exists());
    assert!(!dir.path().join(FUELINGS_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_bad_lines_do_not_abort_the_run() -> Result<()> {
    let input = format!(
        "{}{}{}{}",
        HEADER,
        "1;;tax;2022-13-45;;;0;;;10;;;;;;;;;;;EUR;;\n",
        "not;a;record\n",
        "2;;tax;2022-01-10;;;0;;;10;;;;;;;;;;;EUR;;\n",
    );
    let dir = convert(&input, false).await?;

    let costs = read_lines(&dir, COSTS_FILE);
    assert_eq!(costs.len(), 2);
    assert!(costs[1].starts_with("10.01.2022;0,00;6;"));
    Ok(())
}

#[tokio::test]
async fn test_legacy_export_and_miles() -> Result<()> {
    // 21 columns: no fuel_name and gas_station_name
    let input = ";3;;2020-05-05;2;;100000;100;5;25;;partial;winter;speedy;0;1;0;;;;EUR\n";
    let dir = convert(input, true).await?;

    let fuelings = read_lines(&dir, FUELINGS_FILE);
    assert_eq!(
        fuelings[1],
        "05.05.2020;62137;62,14;5;25;\"EUR\";2;2;8;3;;\"\";8,05;;;;\"\";;\"\";\"\""
    );
    Ok(())
}

#[tokio::test]
async fn test_note_split_over_crlf_lines() -> Result<()> {
    let input = format!(
        "{}{}{}",
        HEADER,
        "5;;care;2023-04-01;;;1000;;;30;\"wash\r\n",
        "and wax\";;;;;;;;;;EUR;;\n",
    );
    let dir = convert(&input, false).await?;

    let content = std::fs::read_to_string(dir.path().join(COSTS_FILE))?;
    assert!(content.contains("01.04.2023;1000,00;12;\"wash\r\nand wax\";30;\"EUR\""));
    Ok(())
}

#[tokio::test]
async fn test_no_records_no_files() -> Result<()> {
    let dir = convert(HEADER, false).await?;
    assert!(!dir.path().join(COSTS_FILE).exists());
    assert!(!dir.path().join(FUELINGS_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_read_error_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = ConverterConfig {
        output_dir: temp_dir.path().to_path_buf(),
        poll_interval: Duration::from_millis(10),
        ..ConverterConfig::default()
    };
    let stop = CancellationToken::new();
    let (pipeline, tx) =
        ConversionPipeline::new(LocalStorage::new(temp_dir.path()), config, stop.clone());
    let worker = tokio::spawn(async move { EtlEngine::new(pipeline).run().await });

    let input = format!("{}{}", HEADER, "4;;insurance;2022-02-02;;;0;;;900;;;;;;;;;;;EUR;;\n");
    let reader = tokio_test::io::Builder::new()
        .read(input.as_bytes())
        .read_error(std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated"))
        .build();
    let read = feed_lines(tokio::io::BufReader::new(reader), tx, CancellationToken::new()).await;
    stop.cancel();

    assert!(matches!(read, Err(EtlError::IoError(_))));
    assert!(matches!(worker.await?, Err(EtlError::IoError(_))));
    assert!(!temp_dir.path().join(COSTS_FILE).exists());
    assert!(!temp_dir.path().join(FUELINGS_FILE).exists());
    Ok(())
}
