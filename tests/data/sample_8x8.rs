// 8x8 interleaved RGB sample: even pixels (100, 150, 200), odd pixels (50, 50, 50).
#[allow(dead_code)]
const SAMPLE_8X8_RGB: [u8; 192] = [
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
    100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50, 100, 150, 200, 50, 50, 50,
];
