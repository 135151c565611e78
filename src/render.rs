use std::{
    io::{self, Write},
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

use lib_2048::Board;

const SQUARE_HEIGHT: usize = 3;
const SQUARE_WIDTH: usize = 2 * (SQUARE_HEIGHT + 1) - 1;
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];

fn frame_row(size: usize, left: &str, middle: &str, right: &str, fill: &str) -> String {
    let cell = fill.repeat(SQUARE_WIDTH);
    let inner = vec![cell; size].join(middle);

    format!("{left}{inner}{right}\n")
}

fn colour(value: u32) -> u8 {
    let exponent = value.trailing_zeros() as usize;

    COLOUR_TABLE[exponent.saturating_sub(1) % COLOUR_TABLE.len()]
}

fn draw_board_row(out: &mut impl Write, row: &[Option<u32>]) -> io::Result<()> {
    for line in 0..SQUARE_HEIGHT {
        if line != 0 {
            out.write_all(b"\x1b[E")?;
        }

        for &cell in row {
            match cell {
                Some(value) if line == SQUARE_HEIGHT / 2 => {
                    let colour = colour(value);
                    write!(out, "┃\x1b[7m\x1b[{colour}m{value:^SQUARE_WIDTH$}\x1b[m")?;
                }
                Some(value) => {
                    let colour = colour(value) + 10;
                    write!(out, "┃\x1b[{colour}m{:SQUARE_WIDTH$}\x1b[m", "")?;
                }
                None => write!(out, "┃{:SQUARE_WIDTH$}", "")?,
            }
        }
    }

    Ok(())
}

/// Lines between the cursor (just below the board) and the header line.
const fn header_offset(size: usize) -> usize {
    size * (SQUARE_HEIGHT + 1) + 2
}

/// Lines between the cursor and the first line of `row`.
const fn row_offset(size: usize, row: usize) -> usize {
    (SQUARE_HEIGHT + 1) * (size - row)
}

pub fn draw_board(out: &mut impl Write, board: &Board, header: &str) -> io::Result<()> {
    let size = board.size();

    writeln!(out, "\n{header}")?;
    out.write_all(frame_row(size, "┏", "┳", "┓", "━").as_bytes())?;

    let empty_row = frame_row(size, "┃", "┃", "┃", " ");
    let separator_row = frame_row(size, "┣", "╋", "┫", "━");

    for row in 0..size {
        if row != 0 {
            out.write_all(separator_row.as_bytes())?;
        }

        for _ in 0..SQUARE_HEIGHT {
            out.write_all(empty_row.as_bytes())?;
        }
    }

    out.write_all(frame_row(size, "┗", "┻", "┛", "━").as_bytes())?;

    redraw_board(out, &Board::empty(size), board, header)
}

/// Rewrites the header and the rows that differ between `old_board` and `new_board`.
///
/// Both boards must have the size of the board last passed to [`draw_board`].
pub fn redraw_board(
    out: &mut impl Write,
    old_board: &Board,
    new_board: &Board,
    header: &str,
) -> io::Result<()> {
    let size = new_board.size();

    let mut current_line = header_offset(size);
    write!(out, "\x1b[{current_line}F\x1b[2K{header}")?;

    let changed_rows = (0..size).filter(|&row| old_board.row(row) != new_board.row(row));

    for row in changed_rows {
        let target_line = row_offset(size, row);

        if target_line > current_line {
            write!(out, "\x1b[{}F", target_line - current_line)?;
        } else {
            write!(out, "\x1b[{}E", current_line - target_line)?;
        }

        draw_board_row(out, new_board.row(row))?;
        current_line = target_line - (SQUARE_HEIGHT - 1);
    }

    write!(out, "\x1b[{current_line}E")?;
    out.flush()
}

/// Non-canonical, no-echo terminal mode. The previous settings come back on drop.
pub struct RawMode {
    fd: RawFd,
    original: libc::termios,
}

impl RawMode {
    pub fn enable(fd: &impl AsRawFd) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let mut termios = MaybeUninit::uninit();

        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }

            termios.assume_init()
        };

        let mut raw = original;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON);

        unsafe {
            if libc::tcsetattr(fd, libc::TCSADRAIN, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(Self { fd, original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSADRAIN, &self.original);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rows_scale_with_size() {
        let top = frame_row(5, "┏", "┳", "┓", "━");

        assert_eq!(top.matches('┳').count(), 4);
        assert_eq!(top.chars().filter(|&c| c == '━').count(), 5 * SQUARE_WIDTH);
    }

    #[test]
    fn offsets_match_four_by_four_layout() {
        assert_eq!(header_offset(4), 18);
        assert_eq!(row_offset(4, 3), 4);
        assert_eq!(row_offset(4, 0), 16);
    }

    #[test]
    fn tile_text_is_centred() {
        let mut out = Vec::new();
        draw_board_row(&mut out, &[Some(2048), None]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" 2048  "));
        assert_eq!(text.matches("\x1b[E").count(), SQUARE_HEIGHT - 1);
    }

    #[test]
    fn full_draw_ends_below_board() {
        let mut out = Vec::new();
        let board = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);

        draw_board(&mut out, &board, "Score: 0").unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nScore: 0\n┏"));
        // Only rows 0 and 3 differ from the empty board.
        assert!(text.contains("\x1b[18F\x1b[2KScore: 0\x1b[2E┃"));
        assert!(text.contains("\x1b[10E┃"));
        assert!(text.ends_with("\x1b[2E"));
    }
}
