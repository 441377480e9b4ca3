use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{Color, Move, Square};
use lib::{game::Game, remote::Remote};
use std::{future::pending, io, ops::ControlFlow, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, instrument, warn};

/// Terminal commands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Parser)]
#[clap(
    name = "",
    multicall = true,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
enum Cmd {
    /// Move a piece on the board.
    #[clap(after_help = r#"SYNTAX:
    <MOVE>      ::= <SQUARE:from><SQUARE:to>
    <SQUARE>    ::= <FILE><RANK>
    <FILE>      ::= a|b|c|d|e|f|g|h
    <RANK>      ::= 1|2|3|4|5|6|7|8"#)]
    Move {
        /// A move in coordinate notation, e.g. e2e4.
        token: Move,
    },

    /// List the squares a piece can move to.
    Moves {
        /// The square the piece stands on, e.g. g1.
        square: Square,
    },

    /// Display the board.
    Show,

    /// Start over from the initial position.
    New,

    /// Leave the game.
    Quit,
}

type Peer = Option<(Color, Box<dyn Remote + Send>)>;

/// Seats the local player in front of a [`Game`].
///
/// Commands are read from the terminal. In online games the local player
/// controls one side only, and moves are exchanged with the peer.
pub struct Table<T: Remote> {
    game: Game,
    terminal: T,
    peer: Peer,
}

impl<T: Remote + Send> Table<T> {
    /// Both sides are played from the same terminal.
    pub fn local(game: Game, terminal: T) -> Self {
        Table {
            game,
            terminal,
            peer: None,
        }
    }

    /// The local player controls `side`, the peer controls the other one.
    pub fn online(game: Game, terminal: T, side: Color, peer: Box<dyn Remote + Send>) -> Self {
        Table {
            game,
            terminal,
            peer: Some((side, peer)),
        }
    }

    /// Runs the session until the local player quits or either party hangs up.
    #[instrument(level = "trace", skip(self), err)]
    pub async fn run(&mut self) -> Result<(), Anyhow> {
        let timed = self.game.clock().is_some();
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.show().await?;

        loop {
            self.terminal.flush().await?;

            let flow = tokio::select! {
                line = self.terminal.recv() => self.input(line).await?,
                msg = recv(&mut self.peer) => self.remote(msg).await?,
                _ = ticker.tick(), if timed => self.tick().await?,
            };

            if flow.is_break() {
                break Ok(());
            }
        }
    }

    async fn input(&mut self, line: io::Result<String>) -> Result<ControlFlow<()>, Anyhow> {
        let line = match line {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(ControlFlow::Break(())),
            line => line?,
        };

        if line.trim().is_empty() {
            return Ok(ControlFlow::Continue(()));
        }

        match Cmd::try_parse_from(line.split_whitespace()) {
            Ok(cmd) => self.execute(cmd).await,
            Err(e) => {
                self.terminal.send(e.to_string().trim_end()).await?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    #[instrument(level = "trace", skip(self), err)]
    async fn execute(&mut self, cmd: Cmd) -> Result<ControlFlow<()>, Anyhow> {
        match cmd {
            Cmd::Move { token } => self.play(token).await?,
            Cmd::Moves { square } => self.moves(square).await?,
            Cmd::Show => self.show().await?,

            Cmd::New if self.peer.is_some() => {
                let msg = "a new game cannot be started while playing online";
                self.terminal.send(msg).await?;
            }

            Cmd::New => {
                self.game.new_game();
                info!("new game");
                self.show().await?;
            }

            Cmd::Quit => return Ok(ControlFlow::Break(())),
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn play(&mut self, m: Move) -> io::Result<()> {
        let turn = self.game.position().turn();

        if let Some((side, _)) = &self.peer {
            if *side != turn {
                let msg = format!("wait for {} to move", self.game.settings().name(turn));
                return self.terminal.send(&msg).await;
            }
        }

        match self.game.play(m) {
            Err(e) => self.terminal.send(&e.to_string()).await,
            Ok(()) => {
                if let Some((_, peer)) = &mut self.peer {
                    peer.send(&m.to_string()).await?;
                    peer.flush().await?;
                }

                self.show().await
            }
        }
    }

    async fn moves(&mut self, square: Square) -> io::Result<()> {
        let pos = self.game.position();

        let msg = match pos.piece_on(square) {
            None => format!("there is no piece on {}", square),
            Some(_) => match pos.destinations(square) {
                ds if ds.is_empty() => format!("the piece on {} cannot move", square),
                ds => ds
                    .iter()
                    .map(|&sq| match pos.piece_on(sq) {
                        Some(_) => format!("x{}", sq),
                        None => sq.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            },
        };

        self.terminal.send(&msg).await
    }

    async fn remote(&mut self, msg: io::Result<String>) -> Result<ControlFlow<()>, Anyhow> {
        let token = match msg {
            Ok(token) => token,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.terminal.send("the opponent left the game").await?;
                return Ok(ControlFlow::Break(()));
            }
            Err(e) => return Err(e.into()),
        };

        match self.game.mirror(token.trim()) {
            Err(e) => warn!(%token, "ignored message from the opponent, {}", e),
            Ok(m) => {
                let mover = !self.game.position().turn();
                let msg = format!("{} played {}", self.game.settings().name(mover), m);
                self.terminal.send(&msg).await?;
                self.show().await?;
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn tick(&mut self) -> Result<ControlFlow<()>, Anyhow> {
        let ended = self.game.outcome().is_some();

        if let Some(o) = self.game.tick() {
            if !ended {
                self.terminal.send(&self.game.announce(o)).await?;
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn show(&mut self) -> io::Result<()> {
        let pos = self.game.position();
        let settings = self.game.settings();
        let mut lines = vec![format!("{:#}", pos.board())];

        if let Some(clock) = self.game.clock() {
            for c in [Color::White, Color::Black] {
                let s = clock.remaining(c).as_secs();
                lines.push(format!("{} ({}) {}:{:02}", settings.name(c), c, s / 60, s % 60));
            }
        }

        lines.push(match self.game.outcome() {
            Some(o) => self.game.announce(o),
            None => format!("{} ({}) to move", settings.name(pos.turn()), pos.turn()),
        });

        self.terminal.send(&lines.join("\n")).await
    }
}

async fn recv(peer: &mut Peer) -> io::Result<String> {
    match peer {
        Some((_, remote)) => remote.recv().await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lib::chess::{IllegalMove, Piece, Position, Role};
    use lib::remote::Pipe;
    use lib::settings::Settings;
    use mockall::mock;
    use std::collections::{HashSet, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::thread::sleep;
    use tokio::io::{duplex, DuplexStream};

    mock! {
        Terminal {}

        #[async_trait]
        impl Remote for Terminal {
            async fn recv(&mut self) -> io::Result<String>;
            async fn send(&mut self, msg: &str) -> io::Result<()>;
            async fn flush(&mut self) -> io::Result<()>;
        }
    }

    type Output = Arc<Mutex<Vec<String>>>;

    fn terminal(lines: &[&str]) -> (MockTerminal, Output) {
        let mut input: VecDeque<String> = lines.iter().map(|s| s.to_string()).collect();
        let output = Output::default();
        let sink = output.clone();

        let mut terminal = MockTerminal::new();

        terminal.expect_recv().returning(move || {
            input
                .pop_front()
                .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
        });

        terminal.expect_send().returning(move |msg| {
            sink.lock().unwrap().push(msg.to_string());
            Ok(())
        });

        terminal.expect_flush().returning(|| Ok(()));

        (terminal, output)
    }

    fn printed(output: &Output, needle: &str) -> bool {
        output.lock().unwrap().iter().any(|l| l.contains(needle))
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn pipe() -> (Pipe<DuplexStream, DuplexStream>, Pipe<DuplexStream, DuplexStream>) {
        let (a, b) = duplex(1 << 16);
        let (c, d) = duplex(1 << 16);
        (Pipe::new(a, d), Pipe::new(c, b))
    }

    async fn wait_for<R: Remote>(remote: &mut R, needle: &str) -> io::Result<()> {
        while !remote.recv().await?.contains(needle) {}
        Ok(())
    }

    #[tokio::test]
    async fn board_is_displayed_when_the_session_starts() -> Result<(), Anyhow> {
        let (terminal, output) = terminal(&[]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        assert!(printed(&output, "White Player (white) to move"));
        Ok(())
    }

    #[tokio::test]
    async fn legal_moves_are_played() -> Result<(), Anyhow> {
        let (terminal, _) = terminal(&["move e2e4", "move e7e5", "quit"]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        let pos = table.game.position();
        assert_eq!(pos.piece_on(sq("e4")), Some(Piece::new(Color::White, Role::Pawn)));
        assert_eq!(pos.piece_on(sq("e5")), Some(Piece::new(Color::Black, Role::Pawn)));
        assert_eq!(pos.turn(), Color::White);
        Ok(())
    }

    #[tokio::test]
    async fn illegal_moves_are_reported() -> Result<(), Anyhow> {
        let (terminal, output) = terminal(&["move e3e4"]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        assert!(printed(&output, &IllegalMove::NoPiece(sq("e3")).to_string()));
        assert_eq!(table.game.position(), &Position::default());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_commands_print_usage() -> Result<(), Anyhow> {
        let (terminal, output) = terminal(&["move e2", "jump e2e4", "  "]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        assert_eq!(output.lock().unwrap().len(), 3);
        assert_eq!(table.game.position(), &Position::default());
        Ok(())
    }

    #[tokio::test]
    async fn moves_lists_destinations() -> Result<(), Anyhow> {
        let (terminal, output) = terminal(&["moves g1", "moves e4", "moves a1"]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        let output = output.lock().unwrap();
        let destinations: HashSet<_> = output[1].split(' ').collect();
        assert_eq!(destinations, HashSet::from(["f3", "h3"]));
        assert_eq!(output[2], "there is no piece on e4");
        assert_eq!(output[3], "the piece on a1 cannot move");
        Ok(())
    }

    #[tokio::test]
    async fn moves_marks_captures() -> Result<(), Anyhow> {
        let (terminal, output) = terminal(&["move e2e4", "move d7d5", "moves e4"]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        let output = output.lock().unwrap();
        let destinations: HashSet<_> = output[3].split(' ').collect();
        assert_eq!(destinations, HashSet::from(["e5", "xd5"]));
        Ok(())
    }

    #[tokio::test]
    async fn new_restores_the_initial_position() -> Result<(), Anyhow> {
        let (terminal, _) = terminal(&["move d2d4", "new"]);
        let mut table = Table::local(Game::new(Settings::default()), terminal);
        table.run().await?;

        assert_eq!(table.game.position(), &Position::default());
        Ok(())
    }

    #[tokio::test]
    async fn running_out_of_time_is_announced_once() -> Result<(), Anyhow> {
        let settings = Settings {
            timer: true,
            time: Duration::from_millis(1),
            ..Settings::default()
        };

        let (terminal, output) = terminal(&[]);
        let mut table = Table::local(Game::new(settings), terminal);
        sleep(Duration::from_millis(2));

        table.tick().await?;
        table.tick().await?;

        let output = output.lock().unwrap();
        assert_eq!(*output, ["Black Player wins - time out!"]);
        Ok(())
    }

    #[tokio::test]
    async fn moves_are_exchanged_with_the_peer() -> Result<(), Anyhow> {
        let (terminal, mut user) = pipe();
        let (peer, mut opponent) = pipe();
        let game = Game::new(Settings::default());
        let mut table = Table::online(game, terminal, Color::White, Box::new(peer));

        let session = async {
            user.send("move e2e4").await?;
            user.flush().await?;
            assert_eq!(opponent.recv().await?, "e2e4");

            opponent.send("e7e5").await?;
            opponent.flush().await?;
            wait_for(&mut user, "Black Player played e7e5").await?;

            user.send("quit").await?;
            user.flush().await
        };

        let (played, drove) = tokio::join!(table.run(), session);
        played?;
        drove?;

        let pos = table.game.position();
        assert_eq!(pos.piece_on(sq("e5")), Some(Piece::new(Color::Black, Role::Pawn)));
        assert_eq!(pos.turn(), Color::White);
        Ok(())
    }

    #[tokio::test]
    async fn local_player_cannot_move_on_the_peer_turn() -> Result<(), Anyhow> {
        let (terminal, mut user) = pipe();
        let (peer, mut opponent) = pipe();
        let game = Game::new(Settings::default());
        let mut table = Table::online(game, terminal, Color::Black, Box::new(peer));

        let session = async {
            user.send("move e2e4").await?;
            user.flush().await?;
            wait_for(&mut user, "wait for White Player to move").await?;

            user.send("quit").await?;
            user.flush().await
        };

        let (played, drove) = tokio::join!(table.run(), session);
        played?;
        drove?;

        assert_eq!(table.game.position(), &Position::default());

        drop(table);
        let e = opponent.recv().await.unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);
        Ok(())
    }

    #[tokio::test]
    async fn new_is_refused_in_online_games() -> Result<(), Anyhow> {
        let (terminal, mut user) = pipe();
        let (peer, _opponent) = pipe();
        let game = Game::new(Settings::default());
        let mut table = Table::online(game, terminal, Color::White, Box::new(peer));

        let session = async {
            user.send("move e2e4").await?;
            user.send("new").await?;
            user.flush().await?;
            wait_for(&mut user, "cannot be started while playing online").await?;

            user.send("quit").await?;
            user.flush().await
        };

        let (played, drove) = tokio::join!(table.run(), session);
        played?;
        drove?;

        assert_ne!(table.game.position(), &Position::default());
        Ok(())
    }

    #[tokio::test]
    async fn malformed_peer_messages_are_ignored() -> Result<(), Anyhow> {
        let (terminal, mut user) = pipe();
        let (peer, mut opponent) = pipe();
        let game = Game::new(Settings::default());
        let mut table = Table::online(game, terminal, Color::Black, Box::new(peer));

        let session = async {
            opponent.send("hello").await?;
            opponent.send("e2e4").await?;
            opponent.flush().await?;
            wait_for(&mut user, "White Player played e2e4").await?;

            user.send("quit").await?;
            user.flush().await
        };

        let (played, drove) = tokio::join!(table.run(), session);
        played?;
        drove?;

        let pos = table.game.position();
        assert_eq!(pos.piece_on(sq("e4")), Some(Piece::new(Color::White, Role::Pawn)));
        assert_eq!(pos.turn(), Color::Black);
        Ok(())
    }

    #[tokio::test]
    async fn session_ends_when_the_peer_hangs_up() -> Result<(), Anyhow> {
        let (terminal, mut user) = pipe();
        let (peer, opponent) = pipe();
        let game = Game::new(Settings::default());
        let mut table = Table::online(game, terminal, Color::White, Box::new(peer));

        drop(opponent);

        let (played, left) = tokio::join!(table.run(), wait_for(&mut user, "left the game"));
        played?;
        left?;

        Ok(())
    }
}
