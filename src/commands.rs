/// Command palette entries and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "cars",
    aliases: &["c", "car", "vehicles"],
    description: "Browse rentable cars",
  },
  Command {
    name: "models",
    aliases: &["m", "model"],
    description: "Browse car models",
  },
  Command {
    name: "colors",
    aliases: &["color", "colours"],
    description: "Browse colors",
  },
  Command {
    name: "brands",
    aliases: &["b", "brand", "makes"],
    description: "Browse brands",
  },
  Command {
    name: "products",
    aliases: &["p", "product", "extras"],
    description: "Browse products",
  },
  Command {
    name: "cart",
    aliases: &["basket"],
    description: "Show the rental cart",
  },
  Command {
    name: "refresh",
    aliases: &["r", "reload", "fetch"],
    description: "Fetch the current list again",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit rentacar",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.trim().to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      5
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  // Stable sort keeps table order within a priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("brands");
    assert_eq!(suggestions[0].name, "brands");
  }

  #[test]
  fn test_alias_match_beats_prefix() {
    // "c" is an alias of cars and a prefix of colors/cart
    let suggestions = get_suggestions("c");
    assert_eq!(suggestions[0].name, "cars");
    assert!(suggestions.iter().any(|c| c.name == "colors"));
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("pro");
    assert_eq!(suggestions[0].name, "products");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("odel");
    assert_eq!(suggestions[0].name, "models");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zzz").is_empty());
  }
}
