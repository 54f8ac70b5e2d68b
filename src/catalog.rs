//! Static catalog data: the thirty playable classics and the 2025 showcase.

/// The closed set of game engines a catalog entry can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Tetris,
    Snake,
    Arkanoid,
    Pinball,
    Pong,
    Maze,
    Platformer,
    Shooter,
}

impl GameKind {
    #[cfg(test)]
    pub fn all() -> &'static [GameKind] {
        &[
            GameKind::Tetris,
            GameKind::Snake,
            GameKind::Arkanoid,
            GameKind::Pinball,
            GameKind::Pong,
            GameKind::Maze,
            GameKind::Platformer,
            GameKind::Shooter,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameKind::Tetris => "Tetris",
            GameKind::Snake => "Snake",
            GameKind::Arkanoid => "Arkanoid",
            GameKind::Pinball => "Pinball",
            GameKind::Pong => "Pong",
            GameKind::Maze => "Maze Master",
            GameKind::Platformer => "Platformer",
            GameKind::Shooter => "Space Shooter",
        }
    }

    /// Engine for a catalog entry: a few titles have a dedicated game,
    /// everything else goes by category.
    pub fn resolve(title: &str, category: &str) -> GameKind {
        match title {
            "Tetris" | "Tetris 2" => return GameKind::Tetris,
            "Arkanoid" | "Breakout" => return GameKind::Arkanoid,
            "Snake" => return GameKind::Snake,
            "Pinball" => return GameKind::Pinball,
            "Pong" => return GameKind::Pong,
            _ => {}
        }
        match category {
            "Shooter" | "Space" => GameKind::Shooter,
            "Platformer" | "Adventure" | "Fighting" | "Action" => GameKind::Platformer,
            "Maze" | "Puzzle" | "Logic" => GameKind::Maze,
            "Sports" | "Racing" | "Simulation" => GameKind::Pong,
            _ => GameKind::Maze,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMetadata {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub icon: &'static str,
}

impl GameMetadata {
    const fn new(id: &'static str, title: &'static str, category: &'static str, icon: &'static str) -> Self {
        Self { id, title, category, icon }
    }

    pub fn description(&self) -> String {
        format!(
            "A legendary {} experience from the golden era of gaming.",
            self.category.to_lowercase()
        )
    }

    pub fn kind(&self) -> GameKind {
        GameKind::resolve(self.title, self.category)
    }
}

pub const RETRO_GAMES: [GameMetadata; 30] = [
    GameMetadata::new("game-0", "Tetris", "Puzzle", "🧩"),
    GameMetadata::new("game-1", "Arkanoid", "Arcade", "🧱"),
    GameMetadata::new("game-2", "Pinball", "Simulation", "⚽"),
    GameMetadata::new("game-3", "Snake", "Classic", "🐍"),
    GameMetadata::new("game-4", "Pac-Man", "Maze", "🍕"),
    GameMetadata::new("game-5", "Space Invaders", "Shooter", "👾"),
    GameMetadata::new("game-6", "Pong", "Sports", "🏓"),
    GameMetadata::new("game-7", "Asteroids", "Space", "☄️"),
    GameMetadata::new("game-8", "Donkey Kong", "Platformer", "🦍"),
    GameMetadata::new("game-9", "Minesweeper", "Logic", "💣"),
    GameMetadata::new("game-10", "Galaga", "Shooter", "🚀"),
    GameMetadata::new("game-11", "Frogger", "Action", "🐸"),
    GameMetadata::new("game-12", "Breakout", "Arcade", "🔨"),
    GameMetadata::new("game-13", "Dig Dug", "Classic", "🚜"),
    GameMetadata::new("game-14", "Q*bert", "Puzzle", "💠"),
    GameMetadata::new("game-15", "Pitfall", "Adventure", "🐊"),
    GameMetadata::new("game-16", "Centipede", "Shooter", "🐛"),
    GameMetadata::new("game-17", "Joust", "Action", "🦅"),
    GameMetadata::new("game-18", "Defender", "Shooter", "🛸"),
    GameMetadata::new("game-19", "Paperboy", "Action", "🚲"),
    GameMetadata::new("game-20", "Zaxxon", "Isometric", "🛰️"),
    GameMetadata::new("game-21", "Tapper", "Simulation", "🍺"),
    GameMetadata::new("game-22", "Rampage", "Action", "🦖"),
    GameMetadata::new("game-23", "Excitebike", "Racing", "🏍️"),
    GameMetadata::new("game-24", "Kung-Fu", "Fighting", "🥋"),
    GameMetadata::new("game-25", "Tetris 2", "Puzzle", "⬜"),
    GameMetadata::new("game-26", "Sokoban", "Logic", "📦"),
    GameMetadata::new("game-27", "Boulder Dash", "Action", "💎"),
    GameMetadata::new("game-28", "Super Mario", "Platformer", "🍄"),
    GameMetadata::new("game-29", "Contra", "Shooter", "🔫"),
];

/// Upcoming title shown in the 2025 gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestGame {
    pub id: u32,
    pub title: &'static str,
    pub release_date: &'static str,
    pub image: &'static str,
    pub description: &'static str,
}

pub const LATEST_GAMES_2025: [LatestGame; 4] = [
    LatestGame {
        id: 1,
        title: "Neon Odyssey 2025",
        release_date: "Jan 2025",
        image: "https://picsum.photos/seed/neon/800/450",
        description: "A cyberpunk visual masterpiece pushing the limits of current-gen hardware.",
    },
    LatestGame {
        id: 2,
        title: "Aetheria Rising",
        release_date: "Feb 2025",
        image: "https://picsum.photos/seed/aether/800/450",
        description: "The next evolution in open-world RPG storytelling.",
    },
    LatestGame {
        id: 3,
        title: "Velocity Prime",
        release_date: "Mar 2025",
        image: "https://picsum.photos/seed/velocity/800/450",
        description: "Hyper-realistic racing with dynamic weather and real-time raytracing.",
    },
    LatestGame {
        id: 4,
        title: "Stellar Horizon",
        release_date: "April 2025",
        image: "https://picsum.photos/seed/stellar/800/450",
        description: "Explore uncharted galaxies in this massive multiplayer space sim.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn by_title(title: &str) -> GameMetadata {
        *RETRO_GAMES.iter().find(|g| g.title == title).unwrap()
    }

    #[test]
    fn test_ids_follow_position() {
        for (i, game) in RETRO_GAMES.iter().enumerate() {
            assert_eq!(game.id, format!("game-{i}"));
        }
    }

    #[test]
    fn test_description_lowercases_category() {
        assert_eq!(
            by_title("Pac-Man").description(),
            "A legendary maze experience from the golden era of gaming."
        );
    }

    #[test]
    fn test_dedicated_titles_win_over_category() {
        assert_eq!(by_title("Tetris 2").kind(), GameKind::Tetris);
        assert_eq!(by_title("Breakout").kind(), GameKind::Arkanoid);
        assert_eq!(by_title("Snake").kind(), GameKind::Snake);
        // Pinball's category would pick Pong
        assert_eq!(by_title("Pinball").kind(), GameKind::Pinball);
        assert_eq!(by_title("Pong").kind(), GameKind::Pong);
    }

    #[test]
    fn test_category_engines() {
        assert_eq!(by_title("Asteroids").kind(), GameKind::Shooter);
        assert_eq!(by_title("Contra").kind(), GameKind::Shooter);
        assert_eq!(by_title("Kung-Fu").kind(), GameKind::Platformer);
        assert_eq!(by_title("Frogger").kind(), GameKind::Platformer);
        assert_eq!(by_title("Sokoban").kind(), GameKind::Maze);
        assert_eq!(by_title("Excitebike").kind(), GameKind::Pong);
        assert_eq!(by_title("Tapper").kind(), GameKind::Pong);
    }

    #[test]
    fn test_unknown_category_falls_back_to_maze() {
        assert_eq!(by_title("Zaxxon").kind(), GameKind::Maze);
        assert_eq!(by_title("Dig Dug").kind(), GameKind::Maze);
        assert_eq!(GameKind::resolve("Anything", "Retro"), GameKind::Maze);
    }

    #[test]
    fn test_every_kind_is_reachable() {
        for kind in GameKind::all() {
            assert!(RETRO_GAMES.iter().any(|g| g.kind() == *kind), "{:?}", kind);
        }
    }
}
