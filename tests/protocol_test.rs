use icinga_passive::protocol::encoded_len;
use icinga_passive::{
    decode_varint, dispatch, encode_varint, Dispatch, FrameAssembler, Message, ProtoSuiteResult,
};

fn suite_frame(project: &str, failed: i32) -> Vec<u8> {
    Message::suite_result(ProtoSuiteResult {
        failed: failed > 0,
        specs_failed_count: failed,
        project_name: project.to_string(),
        ..Default::default()
    })
    .to_frame()
}

fn drain(assembler: &mut FrameAssembler) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while let Some(frame) = assembler.extract_next().unwrap() {
        frames.push(frame.to_vec());
    }
    frames
}

#[test]
fn test_varint_round_trip_across_widths() {
    for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        assert_eq!(buf.len(), encoded_len(value));

        // 后续字节不能被消费
        buf.extend_from_slice(&[0xaa, 0xbb]);
        let (decoded, consumed) = decode_varint(&buf).unwrap().unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, encoded_len(value));
    }
}

#[test]
fn test_frames_independent_of_chunking() {
    // 1. 三帧组成的字节流，其中一帧的长度前缀为两字节
    let big_project = "p".repeat(200);
    let mut stream = suite_frame("shop", 1);
    stream.extend(suite_frame(&big_project, 0));
    stream.extend(Message::kill().to_frame());

    let mut whole = FrameAssembler::new();
    whole.feed(&stream);
    let expected = drain(&mut whole);
    assert_eq!(expected.len(), 3);

    // 2. 以 1 到全长的每种块大小投递
    for chunk_size in 1..=stream.len() {
        let mut assembler = FrameAssembler::new();
        let mut frames = Vec::new();
        for chunk in stream.chunks(chunk_size) {
            assembler.feed(chunk);
            frames.extend(drain(&mut assembler));
        }

        // 3. 按顺序得到相同的帧，没有残留
        assert_eq!(frames, expected, "chunk size {}", chunk_size);
        assert_eq!(assembler.buffered_len(), 0);
    }
}

#[test]
fn test_partial_frame_never_leaks() {
    let frame = suite_frame("shop", 2);
    let mut assembler = FrameAssembler::new();

    for byte in &frame[..frame.len() - 1] {
        assembler.feed(&[*byte]);
        assert!(assembler.extract_next().unwrap().is_none());
    }
    assembler.feed(&frame[frame.len() - 1..]);

    let payload = assembler.extract_next().unwrap().unwrap();
    match dispatch(&payload) {
        Dispatch::SuiteResult(result) => {
            let suite = result.suite_result.unwrap();
            assert_eq!(suite.project_name, "shop");
            assert_eq!(suite.specs_failed_count, 2);
        }
        other => panic!("unexpected dispatch: {:?}", other),
    }
}
