//! 嵌套回溯测试
//!
//! 模拟语法分析器在关键字、标识符之间做试探性选择

mod common;
use common::{advance_n, init_test_logger, snapshot, with_stream};
use markstream_core::{
    CharStream, MarkedCharStream, ReaderSource, SourceConfig, SourceError, StreamConfig,
    TextSource, Unit,
};
use std::io::Cursor;

/// 读取一个由字母组成的标识符
fn identifier<C: CharStream>(stream: &mut C) -> Result<Option<String>, C::Error> {
    let start = stream.index();
    while let Some(Unit::Char(c)) = stream.lookahead(1)? {
        if !c.is_alphabetic() {
            break;
        }
        stream.advance()?;
    }
    if stream.index() == start {
        return Ok(None);
    }
    stream.substring(start, stream.index()).map(Some)
}

/// 关键字必须完整匹配，后面不能紧跟字母
fn keyword<C: CharStream>(stream: &mut C, word: &str) -> Result<bool, C::Error>
where
    C: Sized,
{
    let matched = stream.speculate(|s| {
        if !s.matches_text(word)? {
            return Ok(None);
        }
        match s.lookahead(1)? {
            Some(Unit::Char(c)) if c.is_alphabetic() => Ok(None),
            _ => Ok(Some(())),
        }
    })?;
    Ok(matched.is_some())
}

#[test]
fn test_keyword_prefix_of_identifier_backtracks() {
    with_stream("whenever", false, |s| {
        assert!(!keyword(s, "when").unwrap());
        assert_eq!(snapshot(s), (0, 1, 0));
        assert_eq!(identifier(s).unwrap().as_deref(), Some("whenever"));
        assert_eq!(s.mark_depth(), 0);
    });
}

#[test]
fn test_keyword_case_insensitive() {
    with_stream("WHEN x", true, |s| {
        assert!(keyword(s, "when").unwrap());
        assert_eq!(s.index(), 4);
        assert_eq!(s.substring(0, 4).unwrap(), "WHEN");
    });
}

#[test]
fn test_nested_alternatives() {
    // 外层尝试 "rule then"，内层先尝试 "then" 再尝试 "end"
    with_stream("rule end", false, |s| {
        let outer = s
            .speculate(|s| {
                if !keyword(s, "rule")? {
                    return Ok(None);
                }
                s.advance()?; // 空格
                let depth_inside = s.mark_depth();
                assert_eq!(depth_inside, 1);

                if keyword(s, "then")? {
                    return Ok(Some("then"));
                }
                assert_eq!(s.index(), 5);
                if keyword(s, "end")? {
                    return Ok(Some("end"));
                }
                Ok(None)
            })
            .unwrap();

        assert_eq!(outer, Some("end"));
        assert_eq!(s.index(), 8);
        assert_eq!(s.mark_depth(), 0);
    });
}

#[test]
fn test_outer_rewind_discards_inner_marks() {
    with_stream("abcdef", false, |s| {
        let outer = s.mark();
        s.advance().unwrap();
        let inner = s.mark();
        advance_n(s, 2).unwrap();
        let innermost = s.mark();
        s.advance().unwrap();

        s.rewind_to(outer).unwrap();
        assert_eq!(s.index(), 0);
        assert!(!s.is_open(inner));
        assert!(!s.is_open(innermost));
        assert_eq!(s.mark_depth(), 0);
    });
}

#[test]
fn test_inner_rewind_keeps_outer() {
    with_stream("abcdef", false, |s| {
        let outer = s.mark();
        s.advance().unwrap();
        let inner = s.mark();
        advance_n(s, 3).unwrap();

        s.rewind_to(inner).unwrap();
        assert_eq!(s.index(), 1);
        assert!(s.is_open(outer));

        s.advance().unwrap();
        s.rewind_to(outer).unwrap();
        assert_eq!(s.index(), 0);
    });
}

#[test]
fn test_mark_ids_reuse_depths() {
    with_stream("abc", false, |s| {
        let first = s.mark();
        s.release(first);
        let second = s.mark();
        assert_eq!(first.depth(), second.depth());
        assert!(s.is_open(second));
    });
}

#[test]
fn test_many_speculations_stay_balanced() {
    let text = "a".repeat(200);
    with_stream(&text, false, |s| {
        for _ in 0..200 {
            assert!(!s.matches_text("ab").unwrap());
            assert!(s.matches_text("a").unwrap());
        }
        assert_eq!(s.index(), 200);
        assert_eq!(s.mark_depth(), 0);
    });
}

#[test]
fn test_reader_source_backtracking() {
    init_test_logger();
    let config = SourceConfig {
        read_chunk_size: 3,
        ..SourceConfig::default()
    };
    let text = "rule \"R1\"\nwhen\nthen\nend";
    let mut source = ReaderSource::with_config(Cursor::new(text.as_bytes().to_vec()), &config);
    let mut stream = MarkedCharStream::new(&mut source, "reader", false);

    assert!(keyword(&mut stream, "rule").unwrap());
    let m = stream.mark();
    advance_n(&mut stream, 6).unwrap();
    assert_eq!(snapshot(&stream), (10, 2, 0));
    assert!(keyword(&mut stream, "when").unwrap());

    stream.rewind_to(m).unwrap();
    assert_eq!(snapshot(&stream), (4, 1, 4));
    assert_eq!(stream.substring(5, 9).unwrap(), "\"R1\"");
}

#[test]
fn test_with_config_stream() {
    init_test_logger();
    let config = StreamConfig {
        source_name: String::from("rules.drl"),
        case_fold: true,
        mark_capacity: 2,
    };
    let mut source = TextSource::new("THEN");
    let mut stream = MarkedCharStream::with_config(&mut source, &config);
    assert!(keyword(&mut stream, "then").unwrap());
    assert_eq!(stream.source_name(), "rules.drl");
}

#[test]
fn test_bounded_backup_surfaces_error() {
    init_test_logger();
    let mut source = TextSource::new("abcdef").with_backup_window(3);
    let mut stream = MarkedCharStream::new(&mut source, "bounded", false);

    let m = stream.mark();
    advance_n(&mut stream, 5).unwrap();
    let err = stream.rewind_to(m).unwrap_err();
    assert!(matches!(
        err,
        SourceError::BackupWindowExceeded {
            requested: 5,
            window: 3
        }
    ));
}
