/// Full-screen text pages: story intro, block guide, death, victory.
/// Pure content; drawing goes through `Renderer::draw_page`.

pub fn intro() -> Vec<String> {
    to_lines(&[
        "",
        "  C A V E F A L L",
        "",
        "  The tunnel sealed itself behind you.",
        "  Somewhere below, an old service exit is still marked 'O'.",
        "",
        "  Watch your step: the caves are deeper than they look,",
        "  and not everything down here holds your weight.",
        "",
        "  Press any key to descend.",
    ])
}

pub fn guide() -> Vec<String> {
    to_lines(&[
        "",
        "  Reading the caves:",
        "",
        "    -   platform  stand on it, walk through it",
        "    H   ladder    climb up and down",
        "    0   wall      solid, won't budge",
        "    ^   spikes    lethal to stand on",
        "    ~   water     breaks any fall",
        "    x   crate     push it, stack it, climb it",
        "    *   sand      falls when nothing carries it",
        "    O   exit      your way out",
        "",
        "  Move with W A S D (space also climbs). Esc quits.",
        "",
        "  Press any key to start.",
    ])
}

pub fn death() -> Vec<String> {
    to_lines(&[
        "",
        "  The cave keeps you.",
        "",
        "       / \\",
        "      / - X",
        "      /   \\",
        "",
        "  Press any key.",
    ])
}

pub fn victory() -> Vec<String> {
    to_lines(&[
        "",
        "  Daylight.",
        "",
        "  Every exit found, every cave behind you.",
        "",
        "  Press any key.",
    ])
}

pub fn level_cleared() -> Vec<String> {
    to_lines(&[
        "",
        "  Exit found.",
        "",
        "  Press any key.",
    ])
}

pub fn usage() -> Vec<String> {
    to_lines(&[
        "cavefall — terminal puzzle platformer",
        "",
        "USAGE:",
        "    cavefall [OPTIONS]",
        "",
        "OPTIONS:",
        "    -h, --help           print this help and exit",
        "    -t, --test           replay scripted inputs (see config.toml)",
        "    -l, --level <file>   play a single world file",
        "",
        "Worlds are *.world.txt files in the configured worlds directory,",
        "played in sorted filename order.",
    ])
}

fn to_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
