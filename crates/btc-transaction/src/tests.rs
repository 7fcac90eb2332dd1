//! Crate-level tests for btc-transaction.
//!
//! Wire vectors cover parsing and txid computation of real transactions;
//! the signing vectors were produced independently with RFC6979 nonces and
//! pin the legacy digest, the DER encoding and the script-sig layout
//! byte-for-byte.

use btc_primitives::ec::PrivateKey;
use btc_script::{Address, Network, Script};

use crate::builder::TransactionBuilder;
use crate::helpers::{
    calculate_transaction_fee, create_multi_key_transaction, create_simple_transaction,
    validate_transaction,
};
use crate::input::{TxIn, DEFAULT_SEQUENCE_NUMBER};
use crate::output::TxOut;
use crate::sighash::{self, SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_NONE, SIGHASH_SINGLE};
use crate::signer::{sign_input, verify_input};
use crate::transaction::Transaction;
use crate::utxo::Utxo;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Vectors
// -----------------------------------------------------------------------

/// One input, a data-carrying output and a P2PKH output.
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";
const SOURCE_TXID: &str = "11b476ad8e0a48fcd40807a111a050af51114877e09283bfa7f3505081a1819d";

/// Three inputs, two outputs, non-final sequences and a locktime of 103.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";
const MULTI_INPUT_TXID: &str = "bf5e05fdefc072a3113c69a6d6d0bc092e4e93b037d6785ccc795617132151e6";

/// A coinbase: one input spending the null outpoint.
const COINBASE_TX_HEX: &str = "01000000010000000000000000000000000000000000000000000000000000000000000000ffffffff17033f250d2f43555656452f2c903fb60859897700d02700ffffffff01d864a012000000001976a914d648686cf603c11850f39600e37312738accca8f88ac00000000";
const COINBASE_TXID: &str = "f2feeafa708f31083549ab0b2487efc4cd007b239c5a099a9fc9de25feb0643a";

/// P2PKH locking script for the key with scalar 1.
const KEY_ONE_SCRIPT: &str = "76a914751e76e8199196d454941c45d1b3a323f1433bd688ac";

/// Txid spent by the signing vector.
const SIGNING_PREV_TXID: &str = "e2fa2ae1e9a45b72ff180c2a41a06eea293e1a046426bbc363b0ff141cc6c738";

/// SIGHASH_ALL digest of the unsigned signing vector.
const SIGNING_DIGEST: &str = "ee8036b96e1591185f7a72f73aefe146774e36f87e3e7717d2b616ce8ebafbd6";

/// The signing vector after signing input 0 with the key with scalar 1.
const SIGNED_TX_HEX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006b4830450221008dde6fbacdbed34aeffdaa369d861c140cf2759d6a82fe49000a54889857b0600220473cc385fc6fb24d025f192104476d36714ec6c6766581772497b9d13dcd742701210279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798ffffffff0150c30000000000001976a914751e76e8199196d454941c45d1b3a323f1433bd688ac00000000";
const SIGNED_TXID: &str = "093cbd7fa972c48848a36346c196c3f70e483d6bc3d2465c4e09ac3f81e2fa19";

fn key_one() -> PrivateKey {
    let mut scalar = [0u8; 32];
    scalar[31] = 1;
    PrivateKey::from_bytes(&scalar).unwrap()
}

fn key(byte: u8) -> PrivateKey {
    PrivateKey::from_bytes(&[byte; 32]).unwrap()
}

fn address_of(key: &PrivateKey) -> Address {
    Address::from_public_key(&key.pub_key(), Network::Mainnet)
}

fn utxo_for(key: &PrivateKey, tx_byte: u8, output_index: u32, amount: u64) -> Utxo {
    let address = address_of(key);
    Utxo {
        tx_hash: [tx_byte; 32],
        output_index,
        amount,
        script_pub_key: address.script_pub_key(),
        address: address.to_string(),
    }
}

/// Unsigned: spends `SIGNING_PREV_TXID:3`, pays 50,000 to `KEY_ONE_SCRIPT`.
fn signing_vector() -> Transaction {
    let utxo = Utxo::from_hex(SIGNING_PREV_TXID, 3, 60_000, KEY_ONE_SCRIPT, "").unwrap();
    let mut tx = Transaction::new();
    tx.inputs.push(TxIn::new(utxo.tx_hash, utxo.output_index));
    tx.outputs
        .push(TxOut::new(50_000, Script::from_hex(KEY_ONE_SCRIPT).unwrap()));
    tx
}

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

#[test]
fn test_parse_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse");
    assert_eq!(tx.version, 1);
    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.locktime, 0);
    assert_eq!(tx.inputs[0].prev_tx_hash().to_string(), SIGNING_PREV_TXID);
    assert_eq!(tx.inputs[0].prev_index, 3);
    assert_eq!(tx.outputs[0].amount, 1500);
    assert_eq!(tx.outputs[1].amount, 3498);
    assert_eq!(tx.to_hex(), SOURCE_RAW_TX);
    assert_eq!(tx.to_string(), SOURCE_RAW_TX);
    assert_eq!(tx.id(), SOURCE_TXID);
    assert_eq!(tx.size(), 232);
}

#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse");
    assert_eq!(tx.version, 2);
    assert_eq!(tx.inputs.len(), 3);
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.locktime, 103);
    assert!(tx.inputs.iter().all(|i| i.sequence == 0xffff_fffe));
    assert_eq!(
        tx.inputs[0].prev_tx_hash().to_string(),
        "a0f39f414a691e570fff199d0a350c864d71237b13fb0093d9546adc7f45bca9"
    );
    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
    assert_eq!(tx.id(), MULTI_INPUT_TXID);
}

#[test]
fn test_coinbase_txid() {
    let tx = Transaction::from_hex(COINBASE_TX_HEX).unwrap();
    assert_eq!(tx.inputs[0].prev_tx, [0u8; 32]);
    assert_eq!(tx.inputs[0].prev_index, 0xffff_ffff);
    assert_eq!(tx.id(), COINBASE_TXID);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        Transaction::from_hex("zz"),
        Err(TransactionError::SerializationError(_))
    ));
    assert!(Transaction::from_bytes(&[]).is_err());
    let bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    assert!(Transaction::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn test_serialization_deterministic() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap();
    let copy = tx.clone();
    assert_eq!(tx.serialize(), copy.serialize());
    assert_eq!(tx.hash(), copy.hash());
    assert_eq!(tx.serialize(), tx.to_bytes());
}

// -----------------------------------------------------------------------
// Signature hash
// -----------------------------------------------------------------------

#[test]
fn test_sighash_all_vector() {
    let tx = signing_vector();
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    let digest = sighash::signature_hash(&tx, 0, &script, SIGHASH_ALL).unwrap();
    assert_eq!(hex::encode(digest), SIGNING_DIGEST);
    assert_eq!(
        sighash::signature_hash(&tx, 0, &script, SIGHASH_ALL).unwrap(),
        digest,
        "repeatable"
    );
}

#[test]
fn test_sighash_type_vectors() {
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    let mut tx = Transaction::new();
    tx.inputs.push(TxIn::new([0x01; 32], 0));
    tx.inputs.push(TxIn::new([0x02; 32], 1));
    tx.outputs.push(TxOut::new(1_000, script.clone()));
    tx.outputs.push(TxOut::new(2_000, script.clone()));

    let cases = [
        (SIGHASH_ALL, "b58e8f8fb6dde54a58576544af85c377757ab4d8736a2c3a5cf76567372f61ae"),
        (SIGHASH_NONE, "ac1e18e14445c59f68247f3b656f6e1494218791349a7654d8a4e5cd8f967c6c"),
        (SIGHASH_SINGLE, "69a8845c9ef076d62fc723a7d8cec336a6a5481e13eca1938e798af233dab684"),
        (
            SIGHASH_ALL | SIGHASH_ANYONECANPAY,
            "fdb898a71298fe4af3ba8c1f4042644f946d3f7c469aa945d70e71020ea6dc32",
        ),
        (
            SIGHASH_NONE | SIGHASH_ANYONECANPAY,
            "efc4656cc2686a2ffbf96a30ce9bd356cf9aa407543e46d665cda33b684361e7",
        ),
        (
            SIGHASH_SINGLE | SIGHASH_ANYONECANPAY,
            "f745a29cf27e50e9ec1f2d5dbaf37266c669d88b47a768515e5496027dbb8274",
        ),
    ];

    for (sighash_type, expected) in cases {
        let digest = sighash::signature_hash(&tx, 1, &script, sighash_type).unwrap();
        assert_eq!(hex::encode(digest), expected, "type {:#x}", sighash_type);
    }
}

#[test]
fn test_sighash_single_index_two_of_two_outputs() {
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    let mut tx = Transaction::new();
    for i in 0..3u8 {
        tx.inputs.push(TxIn::new([i; 32], 0));
    }
    tx.outputs.push(TxOut::new(1, script.clone()));
    tx.outputs.push(TxOut::new(2, script.clone()));

    let err = sighash::signature_hash(&tx, 2, &script, SIGHASH_SINGLE).unwrap_err();
    assert!(matches!(
        err,
        TransactionError::SighashSingleIndexExceedsOutputs { index: 2, outputs: 2 }
    ));
    assert!(matches!(
        sign_input(&mut tx, 2, &key_one(), &script, SIGHASH_SINGLE),
        Err(TransactionError::SighashSingleIndexExceedsOutputs { .. })
    ));
}

// -----------------------------------------------------------------------
// Signing and verification
// -----------------------------------------------------------------------

#[test]
fn test_sign_exact_match() {
    let mut tx = signing_vector();
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    sign_input(&mut tx, 0, &key_one(), &script, SIGHASH_ALL).unwrap();

    assert_eq!(tx.to_hex(), SIGNED_TX_HEX);
    assert_eq!(tx.id(), SIGNED_TXID);
    assert!(verify_input(&tx, 0, &script).unwrap());
}

#[test]
fn test_verify_parsed_vector() {
    let tx = Transaction::from_hex(SIGNED_TX_HEX).unwrap();
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    assert!(verify_input(&tx, 0, &script).unwrap());

    let mut tampered = tx.clone();
    tampered.outputs[0].amount = 50_001;
    assert!(!verify_input(&tampered, 0, &script).unwrap());

    let mut tampered = tx;
    tampered.locktime = 1;
    assert!(!verify_input(&tampered, 0, &script).unwrap());
}

#[test]
fn test_foreign_sighash_does_not_verify() {
    // Signed with the 0x41 replay-protected algorithm, not the legacy one.
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let script = Script::from_hex("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();
    let parsed = btc_script::p2pkh::parse_script_sig(&tx.inputs[0].script_sig).unwrap();
    assert_eq!(parsed.sighash_type, 0x41);
    assert!(matches!(verify_input(&tx, 0, &script), Ok(false)));
}

#[test]
fn test_sign_only_touches_signed_input() {
    let sender = key(7);
    let script = address_of(&sender).script_pub_key();
    let mut tx = Transaction::new();
    tx.inputs.push(TxIn::new([1; 32], 0));
    tx.inputs.push(TxIn::new([2; 32], 0));
    tx.outputs.push(TxOut::new(10, script.clone()));

    let before = tx.clone();
    sign_input(&mut tx, 1, &sender, &script, SIGHASH_ALL).unwrap();
    assert_eq!(tx.inputs[0], before.inputs[0]);
    assert_eq!(tx.outputs, before.outputs);
    assert_eq!(tx.inputs[1].sequence, DEFAULT_SEQUENCE_NUMBER);
    assert!(!tx.inputs[1].script_sig.is_empty());
}

#[test]
fn test_sign_rejects_multibyte_sighash_type() {
    let mut tx = signing_vector();
    let script = Script::from_hex(KEY_ONE_SCRIPT).unwrap();
    let before = tx.clone();

    // 0x101 and 0x01 share a low byte but commit to different digests.
    assert!(matches!(
        sign_input(&mut tx, 0, &key_one(), &script, 0x101),
        Err(TransactionError::SigningError(_))
    ));
    assert_eq!(tx, before);
}

// -----------------------------------------------------------------------
// Builder and helpers
// -----------------------------------------------------------------------

#[test]
fn test_change_scenario_and_fee_conservation() {
    let sender = key(1);
    let utxos = vec![utxo_for(&sender, 0xaa, 0, 100_000)];

    let mut builder = TransactionBuilder::new();
    builder.add_utxo(utxos[0].clone()).set_fee(1_000);
    builder.add_output(&address_of(&key(2)).to_string(), 50_000).unwrap();
    builder
        .set_change_address(&address_of(&sender).to_string())
        .unwrap();
    let tx = builder.sign_transaction(&[sender]).unwrap();

    assert_eq!(tx.inputs.len(), 1);
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[1].amount, 49_000);
    assert_eq!(tx.fee(&[100_000]), 1_000);
    assert_eq!(calculate_transaction_fee(&tx, &utxos), 1_000);
    assert_eq!(tx.total_output_amount() + 1_000, 100_000);
    validate_transaction(&tx, &utxos).unwrap();
}

#[test]
fn test_insufficient_funds_builds_nothing() {
    let sender = key(1);
    let mut builder = TransactionBuilder::new();
    builder.add_utxo(utxo_for(&sender, 1, 0, 10_000)).set_fee(1);
    builder.add_output(&address_of(&key(2)).to_string(), 10_000).unwrap();

    assert!(matches!(
        builder.build(),
        Err(TransactionError::InsufficientFunds { required: 10_001, available: 10_000 })
    ));
    assert!(matches!(
        builder.sign_transaction(&[sender]),
        Err(TransactionError::InsufficientFunds { .. })
    ));
}

#[test]
fn test_create_simple_transaction() {
    let sender = key(1);
    let utxos = vec![
        utxo_for(&sender, 0x10, 0, 60_000),
        utxo_for(&sender, 0x11, 2, 60_000),
    ];
    let payee = address_of(&key(2)).to_string();

    let tx = create_simple_transaction(&sender, &utxos, &payee, 100_000, 1, false).unwrap();

    // 10 + 2 * 148 + payee 34 + change 34
    let fee = 374;
    assert_eq!(tx.outputs.len(), 2);
    assert_eq!(tx.outputs[0].amount, 100_000);
    assert_eq!(tx.outputs[1].amount, 120_000 - 100_000 - fee);
    assert_eq!(tx.outputs[1].script_pub_key, address_of(&sender).script_pub_key());
    assert_eq!(calculate_transaction_fee(&tx, &utxos), fee);
    assert!(tx.size() <= 374);
    validate_transaction(&tx, &utxos).unwrap();
}

#[test]
fn test_create_simple_transaction_testnet_change() {
    let sender = key(1);
    let utxos = vec![utxo_for(&sender, 0x10, 0, 60_000)];
    let payee = Address::from_public_key(&key(2).pub_key(), Network::Testnet).to_string();

    let tx = create_simple_transaction(&sender, &utxos, &payee, 10_000, 1, true).unwrap();
    let change = Address::from_script(&tx.outputs[1].script_pub_key, Network::Testnet).unwrap();
    assert!(change.to_string().starts_with('m') || change.to_string().starts_with('n'));
    assert_eq!(change.public_key_hash, sender.pub_key().hash160());
    validate_transaction(&tx, &utxos).unwrap();

    // A mainnet payee cannot be paid from a testnet spend.
    let mainnet_payee = address_of(&key(2)).to_string();
    assert!(matches!(
        create_simple_transaction(&sender, &utxos, &mainnet_payee, 10_000, 1, true),
        Err(TransactionError::InvalidAddress(_))
    ));
}

#[test]
fn test_create_multi_key_transaction() {
    let (alice, bob) = (key(1), key(2));
    let utxos = vec![utxo_for(&alice, 0x20, 0, 30_000), utxo_for(&bob, 0x21, 1, 30_000)];
    let payee = address_of(&key(3)).to_string();
    let change = address_of(&key(4)).to_string();

    let tx = create_multi_key_transaction(
        &[alice.clone(), bob.clone()],
        &utxos,
        &payee,
        50_000,
        2,
        &change,
    )
    .unwrap();
    validate_transaction(&tx, &utxos).unwrap();
    assert_eq!(tx.outputs[1].script_pub_key, address_of(&key(4)).script_pub_key());

    let testnet_change = Address::from_public_key(&key(4).pub_key(), Network::Testnet).to_string();
    assert!(matches!(
        create_multi_key_transaction(
            &[alice.clone(), bob],
            &utxos,
            &payee,
            50_000,
            2,
            &testnet_change
        ),
        Err(TransactionError::InvalidAddress(_))
    ));

    assert!(matches!(
        create_multi_key_transaction(&[alice], &utxos, &payee, 50_000, 2, &change),
        Err(TransactionError::KeyCountMismatch { keys: 1, inputs: 2 })
    ));
}

#[test]
fn test_validate_reports_offending_index() {
    let (alice, bob) = (key(1), key(2));
    let utxos = vec![utxo_for(&alice, 0x30, 0, 5_000), utxo_for(&bob, 0x31, 0, 5_000)];
    let payee = address_of(&key(3)).to_string();

    // Keys swapped: each signature is valid but by the wrong key.
    let mut builder = TransactionBuilder::new();
    builder.add_utxo(utxos[0].clone()).add_utxo(utxos[1].clone());
    builder.add_output(&payee, 10_000).unwrap();
    let tx = builder.clone().sign_transaction(&[bob.clone(), alice.clone()]).unwrap();
    assert!(matches!(
        validate_transaction(&tx, &utxos),
        Err(TransactionError::InvalidSignature { index: 0 })
    ));

    let tx = builder.sign_transaction(&[alice, bob]).unwrap();
    validate_transaction(&tx, &utxos).unwrap();

    let mut moved = utxos.clone();
    moved[1].output_index = 9;
    assert!(matches!(
        validate_transaction(&tx, &moved),
        Err(TransactionError::OutpointMismatch { index: 1 })
    ));

    assert!(matches!(
        validate_transaction(&tx, &utxos[..1]),
        Err(TransactionError::UtxoInputMismatch { inputs: 2, utxos: 1 })
    ));
}

#[test]
fn test_validate_unsigned_input() {
    let sender = key(1);
    let utxos = vec![utxo_for(&sender, 0x40, 0, 5_000)];
    let mut builder = TransactionBuilder::new();
    builder.add_utxo(utxos[0].clone());
    builder.add_output(&address_of(&key(2)).to_string(), 5_000).unwrap();
    let tx = builder.build().unwrap();

    assert!(matches!(
        validate_transaction(&tx, &utxos),
        Err(TransactionError::MalformedScriptSig { index: 0, .. })
    ));
}

#[test]
fn test_calculate_transaction_fee_floors_at_zero() {
    let sender = key(1);
    let utxos = vec![utxo_for(&sender, 1, 0, 100)];
    let mut tx = Transaction::new();
    tx.outputs.push(TxOut::new(500, Script::new()));
    assert_eq!(calculate_transaction_fee(&tx, &utxos), 0);
}
