use anyhow::Result;

use autoboard_core::{AppConfig, Difficulty, LeaderboardClient, LeaderboardSource};

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = LeaderboardClient::new(&config.source)?;
    let snapshot = client.fetch().await?;

    for difficulty in Difficulty::ALL {
        let rows = snapshot.rows(difficulty);
        println!("{} ({} entries)", difficulty, rows.len());
        println!("{}", "-".repeat(40));

        if rows.is_empty() {
            println!("  No records");
        } else {
            println!("{:>4}  {:<20} {:>10}", "#", "Class", "Score");
            for (rank, row) in rows.iter().enumerate() {
                println!(
                    "{:>4}  {:<20} {:>10}",
                    rank + 1,
                    row.class_text(),
                    row.score_text()
                );
            }
        }
        println!();
    }

    Ok(())
}
