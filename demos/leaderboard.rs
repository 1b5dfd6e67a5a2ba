//! Builds a small officer leaderboard and a street leaderboard.
//!
//! Run with: RUST_LOG=debug cargo run --example leaderboard

use chrono::{DateTime, TimeZone, Utc};
use officer_leaderboard::{
    officer_leaderboard, street_leaderboard, Coordinate, LeaderboardOptions, LeaderboardQuery,
    OfficerLeaderboardRow, TicketPoint,
};

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
}

fn main() {
    pretty_env_logger::init();

    let options = LeaderboardOptions::from_env().expect("LEADERBOARD_DAILY_SECRET is too short");

    // Camden morning beat walking north along one street
    let mut points: Vec<TicketPoint> = (0..5)
        .map(|i| {
            TicketPoint::new(
                format!("cam-{}", i),
                "Camden",
                at(9, i * 4),
                Coordinate::new(51.5390 + i as f64 * 0.0005, -0.1426),
            )
            .with_estimates(Some(3500), Some(7000))
            .with_street("Camden High Street")
        })
        .collect();

    // A second Camden officer after lunch, a few streets away
    points.extend((0..3).map(|i| {
        TicketPoint::new(
            format!("cam-pm-{}", i),
            "Camden",
            at(14, i * 6),
            Coordinate::new(51.5450, -0.1510),
        )
        .with_estimates(Some(5000), Some(11_000))
        .with_street("Parkway")
    }));

    // Hackney, one ticket jumps too far to belong to the same run
    points.push(
        TicketPoint::new("hck-0", "Hackney", at(10, 0), Coordinate::new(51.5450, -0.0553))
            .with_street("Mare Street"),
    );
    points.push(
        TicketPoint::new("hck-1", "Hackney", at(10, 3), Coordinate::new(51.5520, -0.0553))
            .with_street("Mare Street"),
    );

    let query = LeaderboardQuery::default();

    println!("Officer leaderboard\n");
    match officer_leaderboard(&points, &query, &options) {
        Ok(board) => {
            for entry in &board {
                let row = OfficerLeaderboardRow::from(entry);
                println!(
                    "  {:>2}. {:<18} {:<8} {} tickets, £{:.2}-£{:.2}  ({:.4}, {:.4})  {}..{}",
                    row.rank,
                    row.label,
                    row.borough,
                    row.tickets,
                    row.est_min_p as f64 / 100.0,
                    row.est_max_p as f64 / 100.0,
                    row.centroid.lat,
                    row.centroid.lon,
                    row.first_seen.format("%H:%M"),
                    row.last_seen.format("%H:%M"),
                );
            }
        }
        Err(e) => println!("  Failed: {}", e),
    }

    println!("\nStreet leaderboard\n");
    match street_leaderboard(&points, &query) {
        Ok(rows) => {
            for row in rows {
                println!("  {:<20} {:<8} {} tickets", row.street, row.borough, row.tickets);
            }
        }
        Err(e) => println!("  Failed: {}", e),
    }
}
