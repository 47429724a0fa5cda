// Simple command-line application to play chess through the game interface

use chessrules::{
    board::PrettyStyle, Game, MoveStatus, OutcomeFilter, PromotePiece, Square,
};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

fn parse_squares(s: &str) -> Option<(Square, Square)> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.len() != 4 || !s.is_ascii() {
        return None;
    }
    let src = Square::from_str(&s[0..2]).ok()?;
    let dst = Square::from_str(&s[2..4]).ok()?;
    Some((src, dst))
}

fn parse_promote(s: &str) -> Option<PromotePiece> {
    match s.trim() {
        "q" | "Q" => Some(PromotePiece::Queen),
        "r" | "R" => Some(PromotePiece::Rook),
        "b" | "B" => Some(PromotePiece::Bishop),
        "n" | "N" => Some(PromotePiece::Knight),
        _ => None,
    }
}

fn prompt(stdin: &mut impl BufRead, text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut s = String::new();
    if stdin.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let mut game = Game::with_filter(OutcomeFilter::Strict);

    loop {
        if let Some(message) = game.game_over_message() {
            println!("{}", game.board().pretty(PrettyStyle::Ascii));
            println!("Game finished: {}", message);
            println!("Notation:");
            println!("{}", game.san_list());
            println!("FEN: {}", game.fen());
            break;
        }

        println!("{}", game.board().pretty(PrettyStyle::Ascii));
        if let Some(king) = game.check_state().king_square() {
            println!("Check to the king on {}!", king);
        }
        let text = format!(
            "{} move ({}), like \"e2e4\": ",
            game.side().as_long_str(),
            game.board().raw().fullmove_number
        );
        let Some(line) = prompt(&mut stdin, &text)? else {
            break;
        };

        match line.as_str() {
            "fen" => {
                println!("{}", game.fen());
                continue;
            }
            "moves" => {
                for pair in game.move_list() {
                    println!(
                        "{:>3}. {:<8} {}",
                        pair.number,
                        pair.white.unwrap_or("..."),
                        pair.black.unwrap_or("")
                    );
                }
                continue;
            }
            _ => {}
        }

        let Some((src, dst)) = parse_squares(&line) else {
            println!("Bad move: expected two squares, like \"e2e4\"");
            println!();
            continue;
        };

        match game.attempt_move(src, dst, None) {
            Ok(MoveStatus::Done(_)) => {}
            Ok(MoveStatus::PromotionPending) => loop {
                let Some(line) = prompt(&mut stdin, "Promote to (q/r/b/n): ")? else {
                    return Ok(());
                };
                match parse_promote(&line) {
                    Some(piece) => match game.promote(piece) {
                        Ok(_) => break,
                        Err(e) => {
                            println!("Cannot promote: {}", e);
                            game.cancel_promotion();
                            break;
                        }
                    },
                    None => println!("Unknown piece \"{}\"", line),
                }
            },
            Err(e) => println!("Bad move: {}", e),
        }

        println!();
    }

    Ok(())
}
