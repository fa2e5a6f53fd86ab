struct Parser<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Parser<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		match c {
			b' ' | b'\t' | b'\r' | b'\n' => true,
			_ => false,
		}
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Parser::is_whitespace);
	}

	fn read_word(&mut self) -> &'a [u8] {
		let orig = self.i;
		self.proceed_while(|c| !Parser::is_whitespace(c));
		&self.line[orig .. self.i]
	}

	fn parse_words(&mut self) -> Vec<&'a [u8]> {
		let mut words: Vec<&'a [u8]> = vec![];
		loop {
			self.skip_whitespaces();
			let word = self.read_word();
			if word.is_empty() {
				break;
			}
			words.push(word);
		}
		words
	}
}

/// Splits a line on blanks. Markers like `|` have to stand alone to be
/// recognized, so `ls|wc` is a single word.
pub fn parse<'a>(line: &'a [u8]) -> Vec<&'a [u8]> {
	let mut parser: Parser<'a> = Parser { line: line, i: 0 };
	parser.parse_words()
}

#[cfg(test)]
mod tests {
	use super::parse;

	#[test]
	fn splits_on_blanks() {
		assert_eq!(parse(b"ls  -l\t/tmp\n"), vec![&b"ls"[..], &b"-l"[..], &b"/tmp"[..]]);
	}

	#[test]
	fn blank_line_has_no_words() {
		assert!(parse(b"").is_empty());
		assert!(parse(b"  \t \r\n").is_empty());
	}

	#[test]
	fn markers_are_ordinary_words() {
		assert_eq!(parse(b"ls | wc -l &\n"), vec![&b"ls"[..], &b"|"[..], &b"wc"[..], &b"-l"[..], &b"&"[..]]);
		assert_eq!(parse(b"ls|wc"), vec![&b"ls|wc"[..]]);
	}
}
